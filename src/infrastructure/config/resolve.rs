//! 설정 값(token/env/cmd 등)을 실제 인증 정보로 해석하는 유틸리티.
//!
//! - 환경변수/프로세스 실행은 인프라 계층에서만 수행한다.

use std::env;
use std::process::Command;

use anyhow::{Context, Result, bail};

use crate::application::config::HostConfig;
use crate::application::ports::CredentialResolution;
use crate::domain::credentials::Credentials;

/// 비밀값(token/password) 해석 결과.
struct SecretResolution {
    secret: Option<String>,
    source: Option<String>,
}

/// Host 인증 정보를 해석한다. 비밀값을 찾지 못하면 `credentials`가 비어 있다.
pub fn resolve_host_credentials(host_cfg: Option<&HostConfig>) -> Result<CredentialResolution> {
    let Some(cfg) = host_cfg else {
        return Ok(CredentialResolution {
            credentials: None,
            source: None,
        });
    };

    let kind = cfg.auth_kind().to_ascii_lowercase();
    if kind == "integrated" {
        return Ok(CredentialResolution {
            credentials: Some(Credentials::Integrated),
            source: Some("integrated".to_string()),
        });
    }

    let resolved = resolve_secret(cfg);
    let Some(secret) = resolved.secret else {
        return Ok(CredentialResolution {
            credentials: None,
            source: resolved.source,
        });
    };

    let credentials = match kind.as_str() {
        "pat" => Credentials::personal_access_token(&secret)?,
        "oauth" => Credentials::oauth(&secret)?,
        "basic" => Credentials::basic(&required_user_name(cfg, "basic")?, &secret)?,
        "aad" => Credentials::azure_active_directory(&required_user_name(cfg, "aad")?, &secret)?,
        other => bail!("unsupported auth kind '{other}' (expected integrated|basic|pat|oauth|aad)"),
    };

    Ok(CredentialResolution {
        credentials: Some(credentials),
        source: resolved.source,
    })
}

fn required_user_name(cfg: &HostConfig, kind: &str) -> Result<String> {
    cfg.user_name
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
        .with_context(|| format!("user_name is required for {kind} auth"))
}

fn resolve_secret(cfg: &HostConfig) -> SecretResolution {
    if let Some(token) = cfg.token.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        return SecretResolution {
            secret: Some(token.to_string()),
            source: Some("inline".to_string()),
        };
    }

    let mut env_hint: Option<String> = None;
    let mut cmd_hint: Option<String> = None;

    if let Some(env_name) = cfg.token_env.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        match env::var(env_name).ok().map(|v| v.trim().to_string()) {
            Some(v) if !v.is_empty() => {
                return SecretResolution {
                    secret: Some(v),
                    source: Some(format!("env:{env_name}")),
                };
            }
            _ => {
                env_hint = Some(format!("env:{env_name} (missing)"));
            }
        }
    }

    if let Some(cmd) = cfg
        .token_command
        .as_ref()
        .filter(|v| v.iter().any(|s| !s.trim().is_empty()))
    {
        let label = format!("cmd:{}", cmd.join(" "));
        match run_token_command(cmd) {
            Ok(token) => {
                let trimmed = token.trim();
                if !trimmed.is_empty() {
                    return SecretResolution {
                        secret: Some(trimmed.to_string()),
                        source: Some(label),
                    };
                }
                cmd_hint = Some(format!("{label} (empty)"));
            }
            Err(_) => {
                cmd_hint = Some(format!("{label} (failed)"));
            }
        }
    }

    SecretResolution {
        secret: None,
        source: cmd_hint.or(env_hint),
    }
}

fn run_token_command(cmd: &[String]) -> Result<String> {
    let program = cmd
        .first()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .context("token_command is empty")?;

    let output = Command::new(&program)
        .args(cmd.iter().skip(1))
        .output()
        .with_context(|| format!("failed to run token command: {program}"))?;

    if !output.status.success() {
        bail!("token command failed: {program} ({})", output.status);
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
