use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Public URL the API is reachable at, used in invitation links and
    /// payment return URLs.
    pub base_url: String,
    pub invitation_ttl_hours: i64,
    pub smtp: Option<SmtpConfig>,
    pub gateway: Option<GatewayConfig>,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub api_key: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let base_url =
            env::var("APP_BASE_URL").unwrap_or_else(|_| format!("http://{host}:{port}"));
        let invitation_ttl_hours = env::var("INVITATION_TTL_HOURS")
            .ok()
            .and_then(|h| h.parse::<i64>().ok())
            .unwrap_or(72);

        let smtp = match env::var("SMTP_HOST") {
            Ok(smtp_host) => Some(SmtpConfig {
                host: smtp_host,
                username: env::var("SMTP_USERNAME").unwrap_or_default(),
                password: env::var("SMTP_PASSWORD").unwrap_or_default(),
                from: env::var("SMTP_FROM")
                    .unwrap_or_else(|_| "noreply@marketplace.local".to_string()),
            }),
            Err(_) => None,
        };

        let gateway = match env::var("PAYMENT_GATEWAY_URL") {
            Ok(gateway_url) => Some(GatewayConfig {
                base_url: gateway_url,
                api_key: env::var("PAYMENT_GATEWAY_KEY").unwrap_or_default(),
            }),
            Err(_) => None,
        };

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            invitation_ttl_hours,
            smtp,
            gateway,
        })
    }
}
