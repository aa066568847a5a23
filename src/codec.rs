//! Conversion between [`Record`]s and the XML rows the Zoho API speaks.
//!
//! Outbound, a record becomes:
//!
//! ```xml
//! <Contacts>
//!   <row no="1">
//!     <FL val="First Name">Bob</FL>
//!     <FL val="Email">bob@smith.com</FL>
//!   </row>
//! </Contacts>
//! ```
//!
//! Inbound, rows are found under `/response/result/<Module>/row` and every `FL` child becomes a
//! field keyed by its normalized `val` label.

use crate::client_error::ClientError;
use crate::field::{to_field_key, LabelMap};
use crate::record::Record;
use crate::response::ApiErrorResponse;
use xml::attribute::OwnedAttribute;
use xml::common::is_xml10_char;
use xml::reader::{EventReader, XmlEvent};
use xml::writer::{EmitterConfig, XmlEvent as WriterEvent};

const RESPONSE: &str = "response";
const RESULT: &str = "result";
const ROW: &str = "row";
const FIELD: &str = "FL";
const FIELD_LABEL: &str = "val";
const RECORD_DETAIL: &str = "recorddetail";

/// Encode a single record as the `xmlData` document of a write call.
pub fn encode(module: &str, record: &Record, labels: &LabelMap) -> Result<String, ClientError> {
    encode_rows(module, std::slice::from_ref(record), labels)
}

/// Encode several records into one document, numbering the rows from 1.
pub fn encode_rows(module: &str, records: &[Record], labels: &LabelMap) -> Result<String, ClientError> {
    let mut out = Vec::new();

    {
        let mut writer = EmitterConfig::new()
            .write_document_declaration(false)
            .create_writer(&mut out);

        writer.write(WriterEvent::start_element(module))?;

        for (index, record) in records.iter().enumerate() {
            let no = (index + 1).to_string();
            writer.write(WriterEvent::start_element(ROW).attr("no", no.as_str()))?;

            for (key, value) in record.iter() {
                let label = labels.label_for(key);
                check_xml_text(key, &label)?;
                check_xml_text(key, value)?;
                writer.write(WriterEvent::start_element(FIELD).attr(FIELD_LABEL, label.as_str()))?;
                if !value.is_empty() {
                    writer.write(WriterEvent::characters(value))?;
                }
                writer.write(WriterEvent::end_element())?;
            }

            writer.write(WriterEvent::end_element())?;
        }

        writer.write(WriterEvent::end_element())?;
    }

    String::from_utf8(out).map_err(|err| ClientError::Xml(err.to_string()))
}

/// Decode every row of a `getRecords`-style response. A response without rows decodes to an
/// empty list.
pub fn decode(module: &str, xml: &str) -> Result<Vec<Record>, ClientError> {
    collect_rows(xml, &[RESPONSE, RESULT, module, ROW])
}

/// Decode the `recorddetail` blocks an insert or update call sends back.
pub fn decode_record_detail(xml: &str) -> Result<Vec<Record>, ClientError> {
    collect_rows(xml, &[RESPONSE, RESULT, RECORD_DETAIL])
}

/// Extract the error code Zoho embeds in an otherwise successful response, if any.
pub fn decode_error(xml: &str) -> Result<Option<ApiErrorResponse>, ClientError> {
    let mut path: Vec<String> = Vec::new();
    let mut code: Option<String> = None;
    let mut message: Option<String> = None;

    for event in EventReader::new(xml.as_bytes()) {
        match event? {
            XmlEvent::StartElement { name, .. } => path.push(name.local_name),
            XmlEvent::Characters(text) | XmlEvent::CData(text) => {
                if path.len() == 3 && path[0] == RESPONSE && (path[1] == "error" || path[1] == "nodata") {
                    match path[2].as_str() {
                        "code" => code.get_or_insert_with(String::new).push_str(&text),
                        "message" => message.get_or_insert_with(String::new).push_str(&text),
                        _ => {}
                    }
                }
            }
            XmlEvent::EndElement { .. } => {
                path.pop();
            }
            _ => {}
        }
    }

    if code.is_none() && message.is_none() {
        return Ok(None);
    }

    Ok(Some(ApiErrorResponse {
        code: code.unwrap_or_default().trim().to_string(),
        message: message.unwrap_or_default().trim().to_string(),
    }))
}

/// Decode the column labels of a `getFields` response, in the order Zoho lists them.
pub fn decode_fields(module: &str, xml: &str) -> Result<Vec<String>, ClientError> {
    let field_path = [module, "section", FIELD];
    let mut path: Vec<String> = Vec::new();
    let mut labels = Vec::new();

    for event in EventReader::new(xml.as_bytes()) {
        match event? {
            XmlEvent::StartElement { name, attributes, .. } => {
                path.push(name.local_name);
                if path_ends_with(&path, &field_path) {
                    if let Some(label) = attribute(&attributes, "label").or_else(|| attribute(&attributes, "dv")) {
                        labels.push(label.to_string());
                    }
                }
            }
            XmlEvent::EndElement { .. } => {
                path.pop();
            }
            _ => {}
        }
    }

    Ok(labels)
}

/// Decode a `getUsers` response. Attributes of each `user` element become fields and the element
/// text becomes `name`.
pub fn decode_users(xml: &str) -> Result<Vec<Record>, ClientError> {
    let user_path = ["users", "user"];
    let mut path: Vec<String> = Vec::new();
    let mut users = Vec::new();
    let mut user: Option<(Record, String)> = None;

    for event in EventReader::new(xml.as_bytes()) {
        match event? {
            XmlEvent::StartElement { name, attributes, .. } => {
                path.push(name.local_name);
                if path_is(&path, &user_path) {
                    let record = attributes
                        .into_iter()
                        .map(|attr| (to_field_key(&attr.name.local_name), attr.value))
                        .collect();
                    user = Some((record, String::new()));
                }
            }
            XmlEvent::Characters(text) | XmlEvent::CData(text) => {
                if path_is(&path, &user_path) {
                    if let Some((_, name)) = user.as_mut() {
                        name.push_str(&text);
                    }
                }
            }
            XmlEvent::EndElement { .. } => {
                if path_is(&path, &user_path) {
                    if let Some((mut record, name)) = user.take() {
                        record.insert("name", name.trim());
                        users.push(record);
                    }
                }
                path.pop();
            }
            _ => {}
        }
    }

    Ok(users)
}

/// Collect every element found at `row_path` as a record built from its `FL` children.
fn collect_rows(xml: &str, row_path: &[&str]) -> Result<Vec<Record>, ClientError> {
    let field_depth = row_path.len() + 1;
    let mut path: Vec<String> = Vec::new();
    let mut rows = Vec::new();
    let mut row: Option<Record> = None;
    let mut field: Option<(String, String)> = None;

    for event in EventReader::new(xml.as_bytes()) {
        match event? {
            XmlEvent::StartElement { name, attributes, .. } => {
                path.push(name.local_name);
                if path_is(&path, row_path) {
                    row = Some(Record::new());
                } else if row.is_some() && path.len() == field_depth && path[field_depth - 1] == FIELD {
                    field = attribute(&attributes, FIELD_LABEL).map(|label| (to_field_key(label), String::new()));
                }
            }
            XmlEvent::Characters(text) | XmlEvent::CData(text) | XmlEvent::Whitespace(text) => {
                if path.len() == field_depth {
                    if let Some((_, value)) = field.as_mut() {
                        value.push_str(&text);
                    }
                }
            }
            XmlEvent::EndElement { .. } => {
                if path.len() == field_depth {
                    if let (Some(record), Some((key, value))) = (row.as_mut(), field.take()) {
                        record.insert(key, value);
                    }
                } else if path_is(&path, row_path) {
                    if let Some(record) = row.take() {
                        rows.push(record);
                    }
                }
                path.pop();
            }
            _ => {}
        }
    }

    Ok(rows)
}

/// XML 1.0 cannot carry some characters (most C0 controls) even escaped.
fn check_xml_text(key: &str, text: &str) -> Result<(), ClientError> {
    match text.chars().find(|c| !is_xml10_char(*c)) {
        Some(c) => Err(ClientError::Xml(format!(
            "field `{}` contains U+{:04X}, which XML 1.0 cannot represent",
            key, c as u32
        ))),
        None => Ok(()),
    }
}

fn attribute<'a>(attributes: &'a [OwnedAttribute], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|attr| attr.name.local_name == name)
        .map(|attr| attr.value.as_str())
}

fn path_is(path: &[String], expected: &[&str]) -> bool {
    path.len() == expected.len() && path_ends_with(path, expected)
}

fn path_ends_with(path: &[String], suffix: &[&str]) -> bool {
    path.len() >= suffix.len()
        && path[path.len() - suffix.len()..]
            .iter()
            .zip(suffix)
            .all(|(element, expected)| element.as_str() == *expected)
}
