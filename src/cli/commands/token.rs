use serde_json::json;

use crate::auth::{generate_jwt, Claims};
use crate::cli::OutputFormat;
use crate::config::config;

pub fn handle(
    subject: String,
    role: Option<String>,
    hours: Option<u64>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let security = &config().security;
    let role = role.unwrap_or_else(|| security.admin_role.clone());
    let hours = hours.unwrap_or(security.jwt_expiry_hours);

    let claims = Claims::new(subject, role, hours);
    let token = generate_jwt(&claims, &security.jwt_secret)?;

    match output_format {
        OutputFormat::Json => println!(
            "{}",
            json!({ "token": token, "sub": claims.sub, "role": claims.role, "exp": claims.exp })
        ),
        OutputFormat::Text => println!("{}", token),
    }
    Ok(())
}
