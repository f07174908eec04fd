//! Named plug commands.

use crate::error::TplinkError;

/// Every command a plug understands by name, with its JSON request.
pub const COMMANDS: [(&str, &str); 12] = [
    ("info", r#"{"system":{"get_sysinfo":{}}}"#),
    ("on", r#"{"system":{"set_relay_state":{"state":1}}}"#),
    ("off", r#"{"system":{"set_relay_state":{"state":0}}}"#),
    ("cloudinfo", r#"{"cnCloud":{"get_info":{}}}"#),
    ("wlanscan", r#"{"netif":{"get_scaninfo":{"refresh":0}}}"#),
    ("time", r#"{"time":{"get_time":{}}}"#),
    ("schedule", r#"{"schedule":{"get_rules":{}}}"#),
    ("countdown", r#"{"count_down":{"get_rules":{}}}"#),
    ("antitheft", r#"{"anti_theft":{"get_rules":{}}}"#),
    ("reboot", r#"{"system":{"reboot":{"delay":1}}}"#),
    ("reset", r#"{"system":{"reset":{"delay":1}}}"#),
    ("energy", r#"{"emeter":{"get_realtime":{}}}"#),
];

/// JSON request of a named command.
#[must_use]
pub fn named(name: &str) -> Option<&'static str> {
    COMMANDS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, request)| *request)
}

/// The request to send for `name`.
///
/// A named command wins over `payload`; any other name needs a raw JSON
/// `payload`.
///
/// # Errors
///
/// Returns [`TplinkError::UnknownCommand`] when `name` is unknown and no
/// payload is given, or [`TplinkError::Payload`] when the payload is not
/// JSON.
pub fn request(name: &str, payload: Option<&str>) -> Result<String, TplinkError> {
    if let Some(request) = named(name) {
        return Ok(request.to_string());
    }
    let payload = payload.ok_or_else(|| TplinkError::UnknownCommand(name.to_string()))?;
    serde_json::from_str::<serde_json::Value>(payload).map_err(TplinkError::Payload)?;
    Ok(payload.to_string())
}
