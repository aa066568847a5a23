//! # zoho-crm-xml
//!
//! Library to help interact with the XML flavour of the Zoho CRM API
//! (`https://crm.zoho.com/crm/private/xml/{module}/{operation}`).
//!
//! Records travel as flat key/value [`Record`]s. Keys are the normalized column labels
//! (`"First Name"` becomes `first_name`) and are turned back into the exact labels Zoho expects
//! when a record is written.
//!
//! The client reads its auth token from a YAML file:
//!
//! ```yaml
//! auth_token: YOUR_AUTH_TOKEN
//! modules: [Accounts, Contacts, Leads, Potentials]
//! ```
//!
//! ### Example
//!
//! ```no_run
//! use zoho_crm_xml::{Client, Record};
//!
//! let client = Client::new("zoho_api_configuration.yaml").unwrap();
//!
//! let mut contact = Record::new();
//! contact.insert("first_name", "Bob");
//! contact.insert("last_name", "Smith");
//! contact.insert("email", "bob@smith.com");
//!
//! client.add_record("Contacts", &contact).unwrap();
//!
//! // an empty list when nothing matches
//! let found = client.find_records("Contacts", "email", "=", "bob@smith.com").unwrap();
//!
//! for record in found.iter() {
//!     if let Some(id) = client.record_id("Contacts", record) {
//!         client.delete_record("Contacts", id).unwrap();
//!     }
//! }
//! ```

mod client_error;
mod client;
pub mod codec;
mod config;
pub mod field;
mod record;
pub mod response;

pub use client::parse_params;
pub use client::Client;
pub use client::DEFAULT_BASE_URL;
pub use client_error::ClientError;
pub use config::Config;
pub use field::LabelMap;
pub use record::Record;
pub use response::ApiResponse;
