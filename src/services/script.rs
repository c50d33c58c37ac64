use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{bin_dir, ProvidersConfig};
use crate::error::AppError;
use crate::provider::ProviderRecord;
use crate::services::provider::ProviderService;

#[derive(Debug)]
pub struct ScriptOutcome {
    pub provider: String,
    pub result: Result<PathBuf, AppError>,
}

pub fn script_name(provider: &str) -> String {
    format!("claude-{provider}")
}

/// Single-quote for bash: `'` becomes `'\''`.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

pub fn render_script(record: &ProviderRecord) -> String {
    let record = record.clone().with_preset_defaults();
    format!(
        r#"#!/usr/bin/env bash
# Claude Code - {display}
# Generated by `ccm generate`.

CCM_ROOT="${{CCM_HOME:-$HOME/claude-model}}"

if [ -x "$CCM_ROOT/node_modules/.bin/claude" ]; then
    CLAUDE_BIN="$CCM_ROOT/node_modules/.bin/claude"
elif command -v claude &> /dev/null; then
    CLAUDE_BIN="$(command -v claude)"
else
    echo "error: claude executable not found" >&2
    echo "install it with: npm install -g @anthropic-ai/claude-code" >&2
    exit 1
fi

export ANTHROPIC_AUTH_TOKEN={key}
export ANTHROPIC_BASE_URL={url}
export ANTHROPIC_MODEL={model}
export API_TIMEOUT_MS=300000
export CLAUDE_CONFIG_DIR="$CCM_ROOT/configs/"{state_dir}

mkdir -p "$CLAUDE_CONFIG_DIR"

exec "$CLAUDE_BIN" "$@"
"#,
        display = record.display_label().replace('\n', " "),
        key = shell_quote(&record.api_key),
        url = shell_quote(&record.base_url),
        model = shell_quote(&record.model),
        state_dir = shell_quote(&format!(".claude-{}", record.name)),
    )
}

fn write_script(dir: &Path, record: &ProviderRecord) -> Result<PathBuf, AppError> {
    let path = dir.join(script_name(&record.name));
    fs::write(&path, render_script(record)).map_err(|e| AppError::io(&path, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .map_err(|e| AppError::io(&path, e))?;
    }
    Ok(path)
}

/// One launcher per saved provider that has a key of its own.
pub fn generate_scripts(config: &ProvidersConfig) -> Result<Vec<ScriptOutcome>, AppError> {
    let dir = bin_dir()?;
    fs::create_dir_all(&dir).map_err(|e| AppError::io(&dir, e))?;

    let outcomes = config
        .providers
        .values()
        .filter(|record| !record.api_key.trim().is_empty())
        .map(|record| {
            // Names from a hand-edited file end up in a path and a shell script.
            let result = ProviderService::validate_name(&record.name)
                .and_then(|()| write_script(&dir, record));
            if let Err(e) = &result {
                log::warn!("failed to write launcher for '{}': {e}", record.name);
            }
            ScriptOutcome {
                provider: record.name.clone(),
                result,
            }
        })
        .collect();
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_quotes_values_and_uses_preset_defaults() {
        let record = ProviderRecord {
            name: "kimi".into(),
            api_key: "sk-it's".into(),
            ..Default::default()
        };
        let script = render_script(&record);
        assert!(script.starts_with("#!/usr/bin/env bash\n"));
        assert!(script.contains(r"export ANTHROPIC_AUTH_TOKEN='sk-it'\''s'"));
        assert!(script.contains("export ANTHROPIC_BASE_URL='https://api.moonshot.cn/v1'"));
        assert!(script.contains(r#"CLAUDE_CONFIG_DIR="$CCM_ROOT/configs/"'.claude-kimi'"#));
        assert!(script.contains("exec \"$CLAUDE_BIN\" \"$@\""));
    }

    #[test]
    fn name_is_never_expanded_by_the_shell() {
        let record = ProviderRecord {
            name: "evil$(touch /tmp/x)".into(),
            api_key: "sk".into(),
            base_url: "https://example.com".into(),
            model: "m".into(),
            ..Default::default()
        };
        let script = render_script(&record);
        assert!(script.contains(
            r#"export CLAUDE_CONFIG_DIR="$CCM_ROOT/configs/"'.claude-evil$(touch /tmp/x)'"#
        ));
        assert!(!script.contains(r#".claude-evil$(touch /tmp/x)""#));
    }
}
