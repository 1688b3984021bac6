//! CLI runner - executes commands

use crate::auth::Credentials;
use crate::cli::commands::{Cli, Commands, OutputFormat, TargetArgs};
use crate::client::Client;
use crate::config::Settings;
use crate::error::Result;
use crate::query;
use crate::resource::Resource;
use crate::response::Response;
use futures::{pin_mut, StreamExt, TryStreamExt};
use serde_json::{json, Map, Value};
use tracing::debug;
use url::form_urlencoded;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let client = self.client().await?;

        match &self.cli.command {
            Commands::Get { target } => self.get(&resource(&client, target)?).await,
            Commands::Head { target } => self.head(&resource(&client, target)?).await,
            Commands::Count { target } => {
                let count = resource(&client, target)?.count().await?;
                self.output(&json!({ "count": count }));
                Ok(())
            }
            Commands::Exists { target } => {
                let exists = resource(&client, target)?.exists().await?;
                self.output(&json!({ "exists": exists }));
                Ok(())
            }
            Commands::First { target } => {
                let record = resource(&client, target)?.first().await?;
                self.output(&record);
                Ok(())
            }
            Commands::Each { target, limit } => {
                let records = resource(&client, target)?.each();
                self.print_records(records, *limit).await
            }
            Commands::Pages { target } => self.pages(&resource(&client, target)?).await,
            Commands::Drain { target, limit } => {
                let records = resource(&client, target)?.while_results();
                self.print_records(records, *limit).await
            }
        }
    }

    /// Settings file merged with command-line overrides
    fn settings(&self) -> Result<Settings> {
        let file = match &self.cli.settings {
            Some(path) => Settings::from_file(path)?,
            None => Settings::default(),
        };

        let flags = Settings {
            base_url: self.cli.base_url.clone(),
            token: self.cli.token.clone(),
            per_page: self.cli.per_page,
            insecure: self.cli.insecure,
            log_bodies: self.cli.verbose,
            ..Default::default()
        };

        Ok(file.merge(flags))
    }

    async fn client(&self) -> Result<Client> {
        let client = self.settings()?.build_client()?;

        if let (Some(username), Some(password)) = (&self.cli.username, &self.cli.password) {
            client
                .auth(&Credentials::new(username.as_str(), password.as_str())?)
                .await?;
        }

        Ok(client)
    }

    async fn get(&self, resource: &Resource) -> Result<()> {
        let response = resource.get_checked().await?;
        self.output(&body_or_text(&response));
        Ok(())
    }

    async fn head(&self, resource: &Resource) -> Result<()> {
        let response = resource.head().await?;
        let headers: Map<String, Value> = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    Value::String(String::from_utf8_lossy(value.as_bytes()).into_owned()),
                )
            })
            .collect();

        self.output(&json!({
            "status": response.status(),
            "headers": headers,
        }));
        Ok(())
    }

    async fn pages(&self, resource: &Resource) -> Result<()> {
        let pages = resource.each_page();
        pin_mut!(pages);

        let mut number = 0u64;
        while let Some(response) = pages.try_next().await? {
            number += 1;
            debug!("Page {} of {}", number, resource);
            self.output(&json!({
                "page": number,
                "body": body_or_text(&response),
            }));
        }
        Ok(())
    }

    async fn print_records<S>(&self, records: S, limit: Option<usize>) -> Result<()>
    where
        S: futures::Stream<Item = Result<Value>>,
    {
        let records = records.take(limit.unwrap_or(usize::MAX));
        pin_mut!(records);

        while let Some(record) = records.try_next().await? {
            self.output(&record);
        }
        Ok(())
    }

    fn output(&self, value: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(value).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
            }
        }
    }
}

/// Resource for a command target with its filters, sorts and params applied
fn resource(client: &Client, target: &TargetArgs) -> Result<Resource> {
    let mut resource = client.resource(&target.path)?;

    for filter in &target.filters {
        resource = resource.filter(filter.as_str())?;
    }
    if !target.sort.is_empty() {
        resource = resource.sort(target.sort.iter().cloned());
    }
    if !target.only.is_empty() {
        resource = resource.only(target.only.iter().cloned());
    }
    if !target.embed.is_empty() {
        resource = resource.embed(target.embed.iter().cloned());
    }
    if !target.query.is_empty() {
        // Round-trip through the codec so `key[]` and `key[sub]` build
        // arrays and mappings
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&target.query)
            .finish();
        resource = resource.query(query::decode(&encoded));
    }

    Ok(resource)
}

fn body_or_text(response: &Response) -> Value {
    match response.body() {
        Ok(body) => (**body).clone(),
        Err(_) => Value::String(response.text().into_owned()),
    }
}
