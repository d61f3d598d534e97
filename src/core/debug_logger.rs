use std::collections::HashMap;
use std::env;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Local;
use flate2::{write::GzEncoder, Compression};
use fs2::FileExt;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEBUG_ENV_VAR: &str = "STATUSPROBE_DEBUG";

// Hardcoded rotation policy
const LOG_ROTATION_SIZE_MB: u64 = 8;
const MAX_ARCHIVES: u32 = 5;
const ROTATION_CHECK_INTERVAL: u32 = 200;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LogEntry {
    pub timestamp: String,                           // ISO-8601 with timezone
    pub level: String,                               // DEBUG, ERROR, PERF, CHECK
    pub component: String,                           // Component name
    pub event: String,                               // Event type
    pub message: String,                             // Human readable message (redacted)
    pub correlation_id: Option<String>,              // Ties together one check invocation
    pub fields: HashMap<String, serde_json::Value>,  // Structured data
}

struct RotatingLogger {
    log_path: PathBuf,
    write_count: AtomicU32,
}

impl RotatingLogger {
    fn new(log_path: PathBuf) -> Self {
        if let Some(parent) = log_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        Self {
            log_path,
            write_count: AtomicU32::new(0),
        }
    }

    fn write_with_rotation(&self, json_line: &str) -> Result<(), std::io::Error> {
        if self.write_count.fetch_add(1, Ordering::Relaxed) % ROTATION_CHECK_INTERVAL == 0 {
            let _ = self.rotate_if_needed(); // Rotation errors never stop logging
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;

        writeln!(file, "{}", json_line)?;
        Ok(())
    }

    fn rotate_if_needed(&self) -> Result<(), std::io::Error> {
        if !self.needs_rotation()? {
            return Ok(());
        }

        // Lock file keeps two processes from rotating at once
        let lock_path = self.log_path.with_extension("lock");
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)?;

        match lock_file.try_lock_exclusive() {
            Ok(()) => {
                if self.needs_rotation()? {
                    self.perform_rotation()?;
                }
                let _ = std::fs::remove_file(&lock_path);
                Ok(())
            }
            Err(_) => Ok(()), // Another process is rotating
        }
    }

    fn needs_rotation(&self) -> Result<bool, std::io::Error> {
        if !self.log_path.exists() {
            return Ok(false);
        }

        let metadata = std::fs::metadata(&self.log_path)?;
        Ok(metadata.len() >= LOG_ROTATION_SIZE_MB * 1024 * 1024)
    }

    fn log_dir_and_stem(&self) -> Result<(&Path, String), std::io::Error> {
        let invalid = || std::io::Error::new(std::io::ErrorKind::InvalidInput, "invalid log path");
        let dir = self.log_path.parent().ok_or_else(invalid)?;
        let stem = self
            .log_path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(invalid)?
            .to_string();
        Ok((dir, stem))
    }

    fn perform_rotation(&self) -> Result<(), std::io::Error> {
        let (log_dir, base_name) = self.log_dir_and_stem()?;
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let archive_path = log_dir.join(format!("{}.{}.gz", base_name, timestamp));

        // Move aside, compress, then drop the uncompressed copy
        let temp_path = self.log_path.with_extension("rotating");
        std::fs::rename(&self.log_path, &temp_path)?;

        let source_file = File::open(&temp_path)?;
        let target_file = File::create(&archive_path)?;
        let mut encoder = GzEncoder::new(target_file, Compression::default());
        std::io::copy(&mut BufReader::new(source_file), &mut encoder)?;
        encoder.finish()?;

        std::fs::remove_file(&temp_path)?;

        let _ = self.cleanup_old_archives();
        Ok(())
    }

    fn cleanup_old_archives(&self) -> Result<(), std::io::Error> {
        let (log_dir, base_name) = self.log_dir_and_stem()?;
        let prefix = format!("{}.", base_name);

        let mut archives = Vec::new();
        for entry in std::fs::read_dir(log_dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();

            if name.starts_with(&prefix) && name.ends_with(".gz") {
                archives.push((entry.path(), entry.metadata()?.modified()?));
            }
        }

        // Keep only the most recent MAX_ARCHIVES
        archives.sort_by_key(|(_, modified)| *modified);
        if archives.len() > MAX_ARCHIVES as usize {
            let to_remove = archives.len() - MAX_ARCHIVES as usize;
            for (path, _) in archives.iter().take(to_remove) {
                let _ = std::fs::remove_file(path);
            }
        }

        Ok(())
    }
}

/// Opt-in JSON Lines debug logger
///
/// Disabled unless `STATUSPROBE_DEBUG` is set to a truthy value. Every write
/// failure is swallowed: logging must never change the outcome of a check.
pub struct DebugLogger {
    enabled: bool,
    rotating_logger: Option<Arc<Mutex<RotatingLogger>>>,
    session_id: String,
    redaction_patterns: Vec<Regex>,
}

impl DebugLogger {
    pub fn new() -> Self {
        Self::with_path(Self::default_log_path(), Self::parse_debug_enabled())
    }

    /// Logger writing to `log_path` when `enabled`
    pub fn with_path(log_path: PathBuf, enabled: bool) -> Self {
        let rotating_logger = if enabled {
            Some(Arc::new(Mutex::new(RotatingLogger::new(log_path))))
        } else {
            None
        };

        Self {
            enabled,
            rotating_logger,
            session_id: Uuid::new_v4().to_string()[..8].to_string(),
            redaction_patterns: Self::compile_redaction_patterns(),
        }
    }

    pub fn disabled() -> Self {
        Self::with_path(PathBuf::new(), false)
    }

    /// Parse `STATUSPROBE_DEBUG`: true/false, 1/0, yes/no, on/off (case insensitive)
    fn parse_debug_enabled() -> bool {
        env::var(DEBUG_ENV_VAR)
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on"))
            .unwrap_or(false)
    }

    pub fn default_log_path() -> PathBuf {
        let mut log_path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        log_path.push(".statusprobe");
        log_path.push("statusprobe-debug.log");
        log_path
    }

    fn compile_redaction_patterns() -> Vec<Regex> {
        let patterns = [
            r"(?i)authorization[:\s]+[^\s\n]+",
            r"(?i)bearer[:\s]+[^\s\n]+",
            r"(?i)password[:\s]+[^\s\n]+",
            r"(?i)api[_-]?key[:=\s]+[^\s&\n]+",
            r"(?i)(token|secret|sig|signature)=[^\s&\n]+",
        ];

        patterns
            .iter()
            .filter_map(|pattern| Regex::new(pattern).ok())
            .collect()
    }

    /// Redact credentials that may ride along in URLs or error messages
    pub fn redact_sensitive_data(&self, text: &str) -> String {
        let mut redacted = text.to_string();
        for regex in &self.redaction_patterns {
            redacted = regex.replace_all(&redacted, "[REDACTED]").to_string();
        }
        redacted
    }

    fn log_sync(
        &self,
        level: &str,
        component: &str,
        event: &str,
        message: &str,
        correlation_id: Option<&str>,
        fields: HashMap<String, serde_json::Value>,
    ) {
        if !self.enabled {
            return;
        }

        let entry = LogEntry {
            timestamp: Local::now().to_rfc3339(),
            level: level.to_string(),
            component: component.to_string(),
            event: event.to_string(),
            message: self.redact_sensitive_data(message),
            correlation_id: Some(
                correlation_id
                    .map(str::to_string)
                    .unwrap_or_else(|| self.session_id.clone()),
            ),
            fields,
        };

        if let Some(logger) = &self.rotating_logger {
            if let Ok(logger) = logger.lock() {
                if let Ok(json_line) = serde_json::to_string(&entry) {
                    let _ = logger.write_with_rotation(&json_line);
                }
            }
        }
    }

    pub fn debug_sync(&self, component: &str, event: &str, message: &str) {
        self.log_sync("DEBUG", component, event, message, None, HashMap::new());
    }

    pub fn error_sync(&self, component: &str, event: &str, message: &str) {
        self.log_sync("ERROR", component, event, message, None, HashMap::new());
    }

    /// New correlation id for one check invocation
    pub fn new_correlation_id(&self) -> String {
        format!("{}-{}", self.session_id, &Uuid::new_v4().to_string()[..8])
    }

    // Typed events for the check lifecycle

    pub fn check_start(&self, target_id: &str, correlation_id: &str) {
        let mut fields = HashMap::new();
        fields.insert("target".to_string(), serde_json::Value::String(target_id.to_string()));

        self.log_sync(
            "CHECK",
            "HealthCheckOrchestrator",
            "check_start",
            &format!("Starting check for {}", target_id),
            Some(correlation_id),
            fields,
        );
    }

    pub fn relay_attempt(&self, target_id: &str, relay_id: &str, error: Option<&str>, correlation_id: &str) {
        let mut fields = HashMap::new();
        fields.insert("target".to_string(), serde_json::Value::String(target_id.to_string()));
        fields.insert("relay".to_string(), serde_json::Value::String(relay_id.to_string()));
        fields.insert("ok".to_string(), serde_json::Value::Bool(error.is_none()));

        let message = match error {
            None => format!("Relay {} answered for {}", relay_id, target_id),
            Some(e) => format!("Relay {} failed for {}: {}", relay_id, target_id, e),
        };
        self.log_sync("CHECK", "RelayClient", "relay_attempt", &message, Some(correlation_id), fields);
    }

    pub fn probe_end(&self, target_id: &str, reachable: bool, duration_ms: u64, correlation_id: &str) {
        let mut fields = HashMap::new();
        fields.insert("target".to_string(), serde_json::Value::String(target_id.to_string()));
        fields.insert("reachable".to_string(), serde_json::Value::Bool(reachable));
        fields.insert("duration_ms".to_string(), serde_json::Value::Number(duration_ms.into()));

        self.log_sync(
            "CHECK",
            "DirectProbe",
            "probe_end",
            &format!("Probe for {} {} ({}ms)", target_id, if reachable { "loaded" } else { "failed" }, duration_ms),
            Some(correlation_id),
            fields,
        );
    }

    pub fn check_end(&self, target_id: &str, status: &str, resolution: &str, duration_ms: u64, correlation_id: &str) {
        let mut fields = HashMap::new();
        fields.insert("target".to_string(), serde_json::Value::String(target_id.to_string()));
        fields.insert("status".to_string(), serde_json::Value::String(status.to_string()));
        fields.insert("resolution".to_string(), serde_json::Value::String(resolution.to_string()));
        fields.insert("duration_ms".to_string(), serde_json::Value::Number(duration_ms.into()));

        self.log_sync(
            "CHECK",
            "HealthCheckOrchestrator",
            "check_end",
            &format!("Check for {} resolved {} via {} ({}ms)", target_id, status, resolution, duration_ms),
            Some(correlation_id),
            fields,
        );
    }

    pub fn stale_result(&self, target_id: &str, ticket: u64, latest: u64) {
        let mut fields = HashMap::new();
        fields.insert("target".to_string(), serde_json::Value::String(target_id.to_string()));
        fields.insert("ticket".to_string(), serde_json::Value::Number(ticket.into()));
        fields.insert("latest".to_string(), serde_json::Value::Number(latest.into()));

        self.log_sync(
            "DEBUG",
            "StatusView",
            "stale_result",
            &format!("Discarded result #{} for {} (latest is #{})", ticket, target_id, latest),
            None,
            fields,
        );
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn get_session_id(&self) -> &str {
        &self.session_id
    }
}

impl Default for DebugLogger {
    fn default() -> Self {
        Self::new()
    }
}

// Factory function mirroring the rest of the crate's constructors
pub fn get_debug_logger() -> DebugLogger {
    DebugLogger::new()
}
