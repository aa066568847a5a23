//! Conversion between the labels Zoho uses for its columns ("First Name") and the keys used
//! inside a [`Record`](crate::Record) (`first_name`).

use std::collections::HashMap;

/// Column labels of the modules this crate knows about. Zoho matches labels exactly on writes,
/// so anything that does not survive `to_field_label(to_field_key(label))` must be listed here.
/// The first entry of each list is the id column.
const KNOWN_LABELS: &[(&str, &[&str])] = &[
    (
        "Accounts",
        &[
            "ACCOUNTID",
            "Account Owner",
            "Account Name",
            "Account Site",
            "Parent Account",
            "Account Number",
            "Account Type",
            "Industry",
            "Annual Revenue",
            "Rating",
            "Phone",
            "Fax",
            "Website",
            "Ticker Symbol",
            "Ownership",
            "Employees",
            "SIC Code",
            "Billing Street",
            "Billing City",
            "Billing State",
            "Billing Code",
            "Billing Country",
            "Shipping Street",
            "Shipping City",
            "Shipping State",
            "Shipping Code",
            "Shipping Country",
            "Description",
        ],
    ),
    (
        "Contacts",
        &[
            "CONTACTID",
            "Contact Owner",
            "Lead Source",
            "First Name",
            "Last Name",
            "Account Name",
            "Vendor Name",
            "Email",
            "Title",
            "Department",
            "Phone",
            "Home Phone",
            "Other Phone",
            "Fax",
            "Mobile",
            "Date of Birth",
            "Assistant",
            "Asst Phone",
            "Reports To",
            "Email Opt Out",
            "Skype ID",
            "Secondary Email",
            "Twitter",
            "Mailing Street",
            "Mailing City",
            "Mailing State",
            "Mailing Zip",
            "Mailing Country",
            "Description",
        ],
    ),
    (
        "Leads",
        &[
            "LEADID",
            "Lead Owner",
            "Company",
            "First Name",
            "Last Name",
            "Designation",
            "Email",
            "Phone",
            "Fax",
            "Mobile",
            "Website",
            "Lead Source",
            "Lead Status",
            "Industry",
            "No of Employees",
            "Annual Revenue",
            "Rating",
            "Email Opt Out",
            "Skype ID",
            "Secondary Email",
            "Street",
            "City",
            "State",
            "Zip Code",
            "Country",
            "Description",
        ],
    ),
    (
        "Potentials",
        &[
            "POTENTIALID",
            "Potential Owner",
            "Potential Name",
            "Account Name",
            "Amount",
            "Closing Date",
            "Stage",
            "Type",
            "Probability",
            "Next Step",
            "Lead Source",
            "Campaign Source",
            "Contact Name",
            "Description",
        ],
    ),
    (
        "Tasks",
        &[
            "ACTIVITYID",
            "Task Owner",
            "Subject",
            "Due Date",
            "Contact Name",
            "Related To",
            "Status",
            "Priority",
            "Send Notification Email",
            "Description",
        ],
    ),
    (
        "Events",
        &[
            "ACTIVITYID",
            "Event Owner",
            "Subject",
            "Start DateTime",
            "End DateTime",
            "Venue",
            "Contact Name",
            "Related To",
            "Description",
        ],
    ),
];

/// Normalize a Zoho column label into a record key: lowercase, whitespace replaced by `_`.
pub fn to_field_key(label: &str) -> String {
    label
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Best-effort inverse of [`to_field_key`], used for keys no [`LabelMap`] knows about.
pub fn to_field_label(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Maps record keys back to the exact labels a module expects.
#[derive(Debug, Clone, Default)]
pub struct LabelMap {
    labels: HashMap<String, String>,
    id_key: Option<String>,
}

impl LabelMap {
    /// Build the label map of a module, seeded with its known labels.
    pub fn for_module(module: &str) -> LabelMap {
        let mut map = LabelMap::default();

        if let Some((_, labels)) = KNOWN_LABELS.iter().find(|(name, _)| *name == module) {
            for label in labels.iter() {
                map.register(label);
            }
            map.id_key = labels.first().map(|label| to_field_key(label));
        } else {
            let singular = module.strip_suffix('s').unwrap_or(module);
            map.id_key = Some(format!("{}id", to_field_key(singular)));
        }

        map
    }

    /// Remember the exact label of a column, replacing any previous label for the same key.
    pub fn register(&mut self, label: &str) {
        self.labels.insert(to_field_key(label), label.to_string());
    }

    /// Label to send for a record key.
    pub fn label_for(&self, key: &str) -> String {
        match self.labels.get(key) {
            Some(label) => label.clone(),
            None => to_field_label(key),
        }
    }

    /// Key of the module's id column, e.g. `contactid`.
    pub fn id_key(&self) -> &str {
        self.id_key.as_deref().unwrap_or("id")
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
