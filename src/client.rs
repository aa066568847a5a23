use crate::client_error::ClientError;
use crate::codec;
use crate::config::Config;
use crate::field::{to_field_key, LabelMap};
use crate::record::Record;
use crate::response::ApiResponse;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Base URL of the XML API. Module and operation names are appended to it.
pub const DEFAULT_BASE_URL: &str = "https://crm.zoho.com/crm/private/xml";

/// `newFormat` sent with reads. `2` includes fields that have no value.
const READ_FORMAT: &str = "2";

/// `newFormat` sent with writes.
const WRITE_FORMAT: &str = "1";

const SCOPE: &str = "crmapi";

/// Module that answers `getUsers`.
const USERS_MODULE: &str = "Users";

pub struct Client {
    auth_token: String,
    modules: Vec<String>,
    base_url: String,
    labels: HashMap<String, LabelMap>,
    http: reqwest::blocking::Client,
}

impl Client {
    /// Create a new client from a YAML configuration file.
    pub fn new<P: AsRef<Path>>(config_path: P) -> Result<Client, ClientError> {
        let config = Config::load(config_path)?;

        Ok(Client::from_config(config))
    }

    /// Create a new client from an already loaded configuration.
    pub fn from_config(config: Config) -> Client {
        let mut client = Client::with_token(config.auth_token, config.modules);

        if let Some(base_url) = config.base_url {
            client.set_base_url(base_url);
        }

        client
    }

    /// Create a new client with an auth token and the modules it will work with.
    pub fn with_token(auth_token: String, modules: Vec<String>) -> Client {
        let labels = modules
            .iter()
            .map(|module| (module.clone(), LabelMap::for_module(module)))
            .collect();

        Client {
            auth_token,
            modules,
            base_url: String::from(DEFAULT_BASE_URL),
            labels,
            http: reqwest::blocking::Client::new(),
        }
    }

    /// Use a preconfigured HTTP client, e.g. one built with a timeout.
    pub fn with_http_client(mut self, http: reqwest::blocking::Client) -> Client {
        self.http = http;
        self
    }
}

impl Client {
    /// Get the auth token.
    pub fn auth_token(&self) -> &str {
        &self.auth_token
    }

    /// Get an abbreviated version of the auth token, safe to log.
    pub fn abbreviated_auth_token(&self) -> String {
        let chars: Vec<char> = self.auth_token.chars().collect();

        if chars.len() < 16 {
            return String::from("****");
        }

        let prefix: String = chars[..9].iter().collect();
        let suffix: String = chars[chars.len() - 4..].iter().collect();

        format!("{}..{}", prefix, suffix)
    }

    /// Get the modules this client was configured with.
    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    /// Get the API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Point the client at another server.
    pub fn set_base_url<S: Into<String>>(&mut self, base_url: S) {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
    }

    /// Labels used when encoding records of `module`.
    pub fn labels(&self, module: &str) -> Cow<'_, LabelMap> {
        match self.labels.get(module) {
            Some(labels) => Cow::Borrowed(labels),
            None => Cow::Owned(LabelMap::for_module(module)),
        }
    }

    /// Id of a record returned by `module`, e.g. its `contactid` field.
    pub fn record_id<'r>(&self, module: &str, record: &'r Record) -> Option<&'r str> {
        record.get(self.labels(module).id_key())
    }

    /// URL of an API operation on a module.
    pub fn create_url(&self, module: &str, operation: &str) -> String {
        format!("{}/{}/{}", self.base_url, module, operation)
    }
}

/// Encode a list of parameters as a URL query string.
pub fn parse_params(params: &[(&str, &str)]) -> Result<String, ClientError> {
    Ok(serde_urlencoded::to_string(params)?)
}

impl Client {
    /// Make a single call to the API and classify the answer.
    ///
    /// `newFormat`, `authtoken` and `scope` are added to `params`. `xml_data`, if any, is sent as
    /// the form-encoded body. Transport failures are returned as errors; API failures are
    /// returned as `ApiResponse::Failure`.
    pub fn call(
        &self,
        method: Method,
        module: &str,
        operation: &str,
        params: &[(&str, &str)],
        xml_data: Option<&str>,
    ) -> Result<ApiResponse, ClientError> {
        let new_format = if method == Method::GET { READ_FORMAT } else { WRITE_FORMAT };
        let mut query = vec![
            ("newFormat", new_format),
            ("authtoken", self.auth_token.as_str()),
            ("scope", SCOPE),
        ];
        query.extend_from_slice(params);

        let url = format!("{}?{}", self.create_url(module, operation), parse_params(&query)?);

        debug!(
            module,
            operation,
            method = %method,
            token = %self.abbreviated_auth_token(),
            "calling Zoho"
        );

        let mut request = self.http.request(method.clone(), url.as_str());

        if let Some(xml_data) = xml_data {
            request = request
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(parse_params(&[("xmlData", xml_data)])?);
        } else if method != Method::GET {
            // Zoho rejects a POST without a Content-Length
            request = request.body(String::new());
        }

        let response = request.send()?;
        let status = response.status().as_u16();
        let body = response.text()?;

        let outcome = ApiResponse::classify(status, body);

        match &outcome {
            ApiResponse::Success(_) => debug!(module, operation, status, "Zoho call succeeded"),
            ApiResponse::NotFound(_) => debug!(module, operation, "Zoho has no data to show"),
            ApiResponse::Failure { status, .. } => {
                warn!(module, operation, status = *status, "Zoho call failed")
            }
        }

        Ok(outcome)
    }

    /// GET `operation` and return the body, or `None` when Zoho has no data.
    fn read(&self, module: &str, operation: &str, params: &[(&str, &str)]) -> Result<Option<String>, ClientError> {
        self.call(Method::GET, module, operation, params, None)?
            .into_read_body()
    }

    /// GET `operation` and decode the rows of `module` found in the response.
    fn read_rows(&self, module: &str, operation: &str, params: &[(&str, &str)]) -> Result<Vec<Record>, ClientError> {
        match self.read(module, operation, params)? {
            Some(body) => codec::decode(module, &body),
            None => Ok(Vec::new()),
        }
    }

    /// POST `operation`; any failure, embedded or not, is an error.
    fn write(
        &self,
        module: &str,
        operation: &str,
        params: &[(&str, &str)],
        xml_data: Option<&str>,
    ) -> Result<String, ClientError> {
        self.call(Method::POST, module, operation, params, xml_data)?
            .into_write_body()
    }
}

impl Client {
    /// Get the records of a module, as many as Zoho returns by default.
    pub fn some(&self, module: &str) -> Result<Vec<Record>, ClientError> {
        self.read_rows(module, "getRecords", &[])
    }

    /// Get the records of a module between two 1-based indexes, inclusive.
    pub fn some_range(&self, module: &str, from_index: usize, to_index: usize) -> Result<Vec<Record>, ClientError> {
        let from_index = from_index.to_string();
        let to_index = to_index.to_string();

        self.read_rows(
            module,
            "getRecords",
            &[("fromIndex", from_index.as_str()), ("toIndex", to_index.as_str())],
        )
    }

    /// Search a module, e.g. `find_records("Contacts", "email", "=", "bob@smith.com")`.
    ///
    /// `field` is a record key; it is sent as the module's label for that key.
    pub fn find_records(
        &self,
        module: &str,
        field: &str,
        condition: &str,
        value: &str,
    ) -> Result<Vec<Record>, ClientError> {
        let label = self.labels(module).label_for(field);
        let search_condition = format!("({}|{}|{})", label, condition, value);

        self.read_rows(
            module,
            "getSearchRecords",
            &[("selectColumns", "All"), ("searchCondition", search_condition.as_str())],
        )
    }

    /// Get a single record by id.
    pub fn find_record_by_id(&self, module: &str, id: &str) -> Result<Option<Record>, ClientError> {
        let records = self.read_rows(module, "getRecordById", &[("id", id)])?;

        Ok(records.into_iter().next())
    }

    /// Get the records of `related_module` attached to a record of `parent_module`.
    pub fn related_records(
        &self,
        parent_module: &str,
        parent_id: &str,
        related_module: &str,
    ) -> Result<Vec<Record>, ClientError> {
        self.read_rows(
            related_module,
            "getRelatedRecords",
            &[("parentModule", parent_module), ("id", parent_id)],
        )
    }

    /// Get the record keys of every column of a module.
    pub fn fields(&self, module: &str) -> Result<Vec<String>, ClientError> {
        let labels = self.field_labels(module)?;

        Ok(labels.iter().map(|label| to_field_key(label)).collect())
    }

    /// Fetch the column labels of a module and use them from now on when encoding its records.
    /// Returns the number of labels fetched.
    pub fn refresh_labels(&mut self, module: &str) -> Result<usize, ClientError> {
        let fetched = self.field_labels(module)?;
        let labels = self
            .labels
            .entry(module.to_string())
            .or_insert_with(|| LabelMap::for_module(module));

        for label in fetched.iter() {
            labels.register(label);
        }

        debug!(module, count = fetched.len(), "refreshed field labels");

        Ok(fetched.len())
    }

    fn field_labels(&self, module: &str) -> Result<Vec<String>, ClientError> {
        match self.read(module, "getFields", &[])? {
            Some(body) => codec::decode_fields(module, &body),
            None => Ok(Vec::new()),
        }
    }

    /// Get the CRM users of a kind, e.g. `AllUsers` or `ActiveUsers`.
    pub fn users(&self, kind: &str) -> Result<Vec<Record>, ClientError> {
        match self.read(USERS_MODULE, "getUsers", &[("type", kind)])? {
            Some(body) => codec::decode_users(&body),
            None => Ok(Vec::new()),
        }
    }

    /// Insert a record. Returns the record detail Zoho sends back (`id`, `created_time`...).
    pub fn add_record(&self, module: &str, record: &Record) -> Result<Option<Record>, ClientError> {
        let xml_data = codec::encode(module, record, &self.labels(module))?;
        let body = self.write(module, "insertRecords", &[], Some(&xml_data))?;

        Ok(codec::decode_record_detail(&body)?.into_iter().next())
    }

    /// Insert several records in one call.
    pub fn add_records(&self, module: &str, records: &[Record]) -> Result<Vec<Record>, ClientError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let xml_data = codec::encode_rows(module, records, &self.labels(module))?;
        // multiple rows are only accepted with version 4
        let params: &[(&str, &str)] = if records.len() > 1 { &[("version", "4")] } else { &[] };
        let body = self.write(module, "insertRecords", params, Some(&xml_data))?;

        codec::decode_record_detail(&body)
    }

    /// Update the given fields of a record.
    pub fn update_record(&self, module: &str, id: &str, record: &Record) -> Result<(), ClientError> {
        let xml_data = codec::encode(module, record, &self.labels(module))?;
        self.write(module, "updateRecords", &[("id", id)], Some(&xml_data))?;

        Ok(())
    }

    /// Delete a record.
    pub fn delete_record(&self, module: &str, id: &str) -> Result<(), ClientError> {
        self.write(module, "deleteRecords", &[("id", id)], None)?;

        Ok(())
    }
}
