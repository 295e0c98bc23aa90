//! The session bridge: routed request in, bounded tool invocation out.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};

use {
    cowork_config::BridgeConfig,
    tokio::sync::{Mutex, RwLock},
    tokio_util::sync::CancellationToken,
    tracing::{debug, info, warn},
};

use crate::{
    capability::{Capability, DEFAULT_CAPABILITIES, SAFE_CAPABILITIES},
    error::{Error, Result},
    exec::{self, RunOpts},
    invocation::{ExecuteOptions, build_command_line},
    result::{InvocationResult, parse_tool_output},
    sanitize::Sanitizer,
    session::Session,
};

/// Environment override forcing machine-parseable tool output even when
/// the ambient environment configures something else.
const OUTPUT_FORMAT_ENV: (&str, &str) = ("CLAUDE_OUTPUT_FORMAT", "json");

/// Session-aware bridge to the external agentic tool.
///
/// Owns the session table and the in-flight process table; construct one
/// per running bridge instance and share it behind an `Arc`. Invocations
/// for the same user are serialized so session-token updates are
/// linearizable; distinct users never block one another.
pub struct Bridge {
    config: BridgeConfig,
    default_capabilities: Vec<Capability>,
    sanitizer: Sanitizer,
    sessions: RwLock<HashMap<String, Session>>,
    inflight: Mutex<HashMap<String, CancellationToken>>,
    user_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Bridge {
    /// Build a bridge from config. Fails if the configured default
    /// capability list names an unknown capability.
    pub fn new(config: BridgeConfig) -> Result<Self> {
        let default_capabilities = if config.default_capabilities.is_empty() {
            DEFAULT_CAPABILITIES.to_vec()
        } else {
            Capability::parse_set(&config.default_capabilities)?
        };
        let sanitizer = Sanitizer::new()?;

        Ok(Self {
            config,
            default_capabilities,
            sanitizer,
            sessions: RwLock::new(HashMap::new()),
            inflight: Mutex::new(HashMap::new()),
            user_locks: Mutex::new(HashMap::new()),
        })
    }

    /// Execute a prompt via the external tool for `user_id`.
    ///
    /// Never panics and never returns `Err`: rejection, spawn failure,
    /// non-zero exit, timeout, and cancellation all come back as a
    /// result value with `success == false`.
    pub async fn execute(
        &self,
        prompt: &str,
        user_id: &str,
        options: ExecuteOptions,
    ) -> InvocationResult {
        let start = Instant::now();
        match self.run(prompt, user_id, &options).await {
            Ok((output, session_id)) => {
                info!(
                    user_id,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "invocation completed"
                );
                InvocationResult::completed(output, session_id, start.elapsed())
            },
            Err(e) => {
                warn!(user_id, error = %e, "invocation failed");
                InvocationResult::failed(e.to_string(), start.elapsed())
            },
        }
    }

    /// Execute with the restricted read-only capability set, for
    /// untrusted callers. Any capability override in `options` is
    /// replaced.
    pub async fn execute_safe(
        &self,
        prompt: &str,
        user_id: &str,
        mut options: ExecuteOptions,
    ) -> InvocationResult {
        options.capabilities = Some(SAFE_CAPABILITIES.to_vec());
        self.execute(prompt, user_id, options).await
    }

    /// Current session for a user, if any. Pure lookup.
    pub async fn status(&self, user_id: &str) -> Option<Session> {
        self.sessions.read().await.get(user_id).cloned()
    }

    /// Request termination of the user's in-flight invocation, if one
    /// exists. Best-effort and non-blocking: the signal is sent and the
    /// handle dropped; the `execute` call that owns the process observes
    /// the termination as a failure result. Returns whether an in-flight
    /// invocation was found.
    pub async fn cancel(&self, user_id: &str) -> bool {
        match self.inflight.lock().await.remove(user_id) {
            Some(token) => {
                info!(user_id, "cancelling in-flight invocation");
                token.cancel();
                true
            },
            None => false,
        }
    }

    /// Drop the user's session record, if any. Does not affect an
    /// in-flight invocation, which keeps the linkage it started with.
    /// Returns whether a record existed.
    pub async fn clear_session(&self, user_id: &str) -> bool {
        let existed = self.sessions.write().await.remove(user_id).is_some();

        // Prune the user's serialization lock so the map does not grow
        // unboundedly. Only safe when the map holds the sole reference:
        // `run` clones the Arc under this same mutex, so a count of one
        // proves no invocation holds or is acquiring the lock.
        let mut locks = self.user_locks.lock().await;
        if locks
            .get(user_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(user_id);
        }

        existed
    }

    /// Snapshot of all active sessions.
    pub async fn list_sessions(&self) -> Vec<(String, Session)> {
        let sessions = self.sessions.read().await;
        let mut all: Vec<_> = sessions.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    async fn run(
        &self,
        prompt: &str,
        user_id: &str,
        options: &ExecuteOptions,
    ) -> Result<(String, Option<String>)> {
        if user_id.is_empty() {
            return Err(Error::EmptyUserId);
        }
        if !self.config.allowed_users.is_empty()
            && !self.config.allowed_users.iter().any(|u| u == user_id)
        {
            return Err(Error::UserNotAllowed(user_id.to_string()));
        }

        let clean = self.sanitizer.sanitize(prompt);
        let clean = clean.trim();
        if clean.is_empty() {
            return Err(Error::EmptyPrompt);
        }

        let capabilities: &[Capability] = match &options.capabilities {
            Some(set) if set.is_empty() => return Err(Error::EmptyCapabilities),
            Some(set) => set,
            None => &self.default_capabilities,
        };

        let working_dir = self.resolve_working_dir(options.working_dir.as_deref())?;

        // Serialize per user: two concurrent calls for one user would
        // otherwise race on the session-token read-modify-write.
        let user_lock = {
            let mut locks = self.user_locks.lock().await;
            Arc::clone(locks.entry(user_id.to_string()).or_default())
        };
        let _guard = user_lock.lock().await;

        let resume = if options.new_session {
            None
        } else {
            self.sessions
                .read()
                .await
                .get(user_id)
                .map(|s| s.session_id.clone())
        };

        let command = build_command_line(
            &self.config.command,
            clean,
            capabilities,
            options.append_system_prompt.as_deref(),
            resume.as_deref(),
        );

        let token = CancellationToken::new();
        self.inflight
            .lock()
            .await
            .insert(user_id.to_string(), token.clone());

        info!(user_id, resuming = resume.is_some(), "invoking external tool");

        let run_opts = RunOpts {
            timeout: options
                .timeout
                .unwrap_or(Duration::from_secs(self.config.timeout_secs)),
            max_output_bytes: self.config.max_output_bytes,
            working_dir,
            env: vec![(OUTPUT_FORMAT_ENV.0.into(), OUTPUT_FORMAT_ENV.1.into())],
        };
        let raw = exec::run_shell(&command, &run_opts, &token).await;
        self.inflight.lock().await.remove(user_id);
        let raw = raw?;

        if raw.exit_code != 0 {
            let stderr = raw.stderr.trim();
            return Err(Error::NonZeroExit {
                code: raw.exit_code,
                stderr: if stderr.is_empty() {
                    "command failed".into()
                } else {
                    stderr.to_string()
                },
            });
        }

        let parsed = parse_tool_output(&raw.stdout);
        if parsed.degraded {
            debug!(user_id, "tool output was not JSON, returning raw text");
        }

        if let Some(ref session_id) = parsed.session_id {
            self.record_session(user_id, session_id).await;
        }

        Ok((parsed.content, parsed.session_id))
    }

    async fn record_session(&self, user_id: &str, session_id: &str) {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(user_id.to_string())
            .and_modify(|s| s.touch(session_id.to_string()))
            .or_insert_with(|| Session::new(session_id.to_string()));
    }

    fn resolve_working_dir(&self, requested: Option<&Path>) -> Result<Option<PathBuf>> {
        match (requested, &self.config.working_dir) {
            (None, root) => Ok(root.clone()),
            (Some(dir), None) => Ok(Some(dir.to_path_buf())),
            (Some(dir), Some(root)) => {
                // A lexical prefix check would let `<root>/../x` through;
                // compare the real paths. Canonicalization also rejects
                // overrides that do not exist.
                let dir = dir.canonicalize()?;
                let root = root.canonicalize()?;
                if dir.starts_with(&root) {
                    Ok(Some(dir))
                } else {
                    Err(Error::WorkingDirNotPermitted { dir, root })
                }
            },
        }
    }
}
