use anyhow::{Error, Result, anyhow};
use dotenvy::dotenv;
use serde::Deserialize;

#[derive(Clone, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DispatchBackend {
    Smtp,
    Noop,
}

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_app_env")]
    pub app_env: String,

    pub appwrite_endpoint: String,
    pub appwrite_project: String,
    pub appwrite_key: String,
    pub db_id: String,
    pub patient_col: String,
    pub doctor_col: String,
    pub appointment_col: Option<String>,

    #[serde(default = "default_patient_user_field")]
    pub patient_user_field: String,
    #[serde(default = "default_doctor_external_field")]
    pub doctor_external_field: String,
    #[serde(default = "default_store_timeout_seconds")]
    pub store_timeout_seconds: u64,

    #[serde(default = "default_dispatch_backend")]
    pub dispatch_backend: DispatchBackend,
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    pub gmail_user: Option<String>,
    pub gmail_app_password: Option<String>,
    pub mail_from: Option<String>,

    pub notification_recipients: Vec<String>,
}

fn default_port() -> u16 {
    3000
}

fn default_app_env() -> String {
    "production".to_string()
}

fn default_patient_user_field() -> String {
    "userId".to_string()
}

fn default_doctor_external_field() -> String {
    "doctorId".to_string()
}

fn default_store_timeout_seconds() -> u64 {
    10
}

fn default_dispatch_backend() -> DispatchBackend {
    DispatchBackend::Smtp
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    465
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        dotenv().ok();

        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut config = envy::from_iter::<_, Self>(vars)
            .map_err(|e| anyhow!("Invalid or missing environmental variable: {}", e))?;

        config.notification_recipients = config
            .notification_recipients
            .iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();

        if config.notification_recipients.is_empty() {
            return Err(anyhow!("NOTIFICATION_RECIPIENTS must list at least one address"));
        }

        if config.dispatch_backend == DispatchBackend::Smtp
            && (config.gmail_user.is_none() || config.gmail_app_password.is_none())
        {
            return Err(anyhow!(
                "GMAIL_USER and GMAIL_APP_PASSWORD are required for the smtp dispatch backend"
            ));
        }

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("development")
    }

    pub fn sender_address(&self) -> Option<&str> {
        self.mail_from.as_deref().or(self.gmail_user.as_deref())
    }
}
