use std::sync::Arc;

use super::table::Table;

/// Immutable column-name to description mapping
///
/// Built once at startup and shared read-only across turns. Keys are a fixed
/// known set; nothing validates them against the loaded table.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptions {
    entries: Vec<(String, String)>,
}

impl FieldDescriptions {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// The built-in schema for the AdventureWorks 2022 denormalized sales table
    pub fn adventure_works() -> Self {
        Self::from_pairs([
            ("sales_order_number", "Unique identifier for each sales order."),
            ("sales_order_date", "The date and time when the sales order was placed. (e.g., Friday, August 25, 2017)"),
            ("sales_order_date_day_of_week", "The day of the week when the sales order was placed (e.g., Monday, Tuesday)."),
            ("sales_order_date_month", "The month when the sales order was placed (e.g., January, February)."),
            ("sales_order_date_day", "The day of the month when the sales order was placed (1-31)."),
            ("sales_order_date_year", "The year when the sales order was placed (e.g., 2022)."),
            ("quantity", "The number of units sold in the sales order."),
            ("unit_price", "The price per unit of the product sold."),
            ("total_sales", "The total sales amount for the sales order (quantity * unit price)."),
            ("cost", "The total cost associated with the products sold in the sales order."),
            ("product_key", "Unique identifier for the product sold."),
            ("product_name", "The name of the product sold."),
            ("reseller_key", "Unique identifier for the reseller."),
            ("reseller_name", "The name of the reseller."),
            ("reseller_business_type", "The type of business of the reseller (e.g., Warehouse, Value Reseller, Specialty Bike Shop)."),
            ("reseller_city", "The city where the reseller is located."),
            ("reseller_state", "The state where the reseller is located."),
            ("reseller_country", "The country where the reseller is located."),
            ("employee_key", "Unique identifier for the employee associated with the sales order."),
            ("employee_id", "The ID of the employee who processed the sales order."),
            ("salesperson_fullname", "The full name of the salesperson associated with the sales order."),
            ("salesperson_title", "The title of the salesperson (e.g., North American Sales Manager, Sales Representative)."),
            ("email_address", "The email address of the salesperson."),
            ("sales_territory_key", "Unique identifier for the sales territory for the actual sale. (e.g. 3)"),
            ("assigned_sales_territory", "List of sales_territory_key separated by comma assigned to the salesperson. (e.g., 3,4)"),
            ("sales_territory_region", "The region of the sales territory. US territory broken down in regions. International regions listed as country name (e.g., Northeast, France)."),
            ("sales_territory_country", "The country associated with the sales territory."),
            ("sales_territory_group", "The group classification of the sales territory. (e.g., Europe, North America, Pacific)"),
            ("target", "The sales target set for the salesperson or territory for the particular month when sales_order_date was placed."),
            ("target_date", "The date by which the sales target should be achieved. All dates are 1st day of the month. (e.g., Friday, August 1, 2017)"),
            ("target_date_day_of_week", "The day of the week for the target date."),
            ("target_date_month", "The month for the target date (e.g., January, February)."),
            ("target_date_day", "The day of the month for the target date. All dates are 1st day of the month. Value is set to 1."),
            ("target_date_year", "The year for the target date (e.g., 2022)."),
        ])
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, description)| description.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, description)| (key.as_str(), description.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A loaded table paired with its column descriptions
#[derive(Debug, Clone)]
pub struct AnnotatedTable {
    pub table: Table,
    pub descriptions: Arc<FieldDescriptions>,
}

/// Pair a loaded table with column descriptions
///
/// Pure pairing, no validation in either direction: table columns without a
/// description stay undescribed and description keys missing from the table
/// are carried along silently.
pub fn annotate(table: Table, descriptions: Arc<FieldDescriptions>) -> AnnotatedTable {
    AnnotatedTable {
        table,
        descriptions,
    }
}

impl AnnotatedTable {
    /// Get a formatted string of the table for the model
    pub fn to_prompt_context(&self, preview_rows: usize) -> String {
        let mut context = String::new();

        context.push_str(&format!("Rows: {}\n", self.table.n_rows()));
        context.push_str("Columns:\n");
        for name in &self.table.columns {
            match self.descriptions.get(name) {
                Some(description) => {
                    context.push_str(&format!("  - {}: {}\n", name, description))
                }
                None => context.push_str(&format!("  - {}\n", name)),
            }
        }

        let preview = preview_rows.min(self.table.n_rows());
        if preview > 0 {
            context.push_str(&format!("\nFirst {} rows:\n", preview));
            context.push_str(&format!("  {}\n", self.table.columns.join(" | ")));
            for row in self.table.rows.iter().take(preview) {
                let cells: Vec<String> = row.iter().map(|cell| cell.to_string()).collect();
                context.push_str(&format!("  {}\n", cells.join(" | ")));
            }
        }

        context
    }

    /// Table columns that have no description (diagnostic display only)
    pub fn undocumented_columns(&self) -> Vec<&str> {
        self.table
            .columns
            .iter()
            .filter(|name| self.descriptions.get(name).is_none())
            .map(|name| name.as_str())
            .collect()
    }

    /// Description keys that match no table column (diagnostic display only)
    pub fn unused_descriptions(&self) -> Vec<&str> {
        self.descriptions
            .iter()
            .filter(|(key, _)| self.table.column_index(key).is_none())
            .map(|(key, _)| key)
            .collect()
    }
}
