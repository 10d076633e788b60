//! Param extraction shared by the handler modules.

pub struct ParamErr {
    pub message: String,
}

fn missing(key: &str) -> ParamErr {
    ParamErr {
        message: format!("missing {}", key),
    }
}

pub fn get_str(params: &serde_json::Value, key: &str) -> Result<String, ParamErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| missing(key))
}

pub fn get_opt_str(params: &serde_json::Value, key: &str) -> Option<String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

pub fn get_bool(params: &serde_json::Value, key: &str) -> Result<bool, ParamErr> {
    params
        .get(key)
        .and_then(|v| v.as_bool())
        .ok_or_else(|| missing(key))
}

pub fn get_opt_i64(params: &serde_json::Value, key: &str) -> Option<i64> {
    params.get(key).and_then(|v| v.as_i64())
}

pub fn get_i64(params: &serde_json::Value, key: &str) -> Result<i64, ParamErr> {
    get_opt_i64(params, key).ok_or_else(|| missing(key))
}
