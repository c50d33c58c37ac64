use std::sync::OnceLock;

/// Env var that forces the UI language (`en` / `zh`).
pub const LANG_ENV: &str = "CCM_LANG";

/// Supported languages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Chinese,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Chinese => "zh",
        }
    }

    pub fn from_code(code: &str) -> Self {
        let code = code.to_lowercase();
        if code.starts_with("zh") || code == "chinese" {
            Language::Chinese
        } else {
            Language::English
        }
    }

    /// `CCM_LANG` wins, then the usual locale variables.
    fn detect() -> Self {
        if let Ok(code) = std::env::var(LANG_ENV) {
            if !code.trim().is_empty() {
                return Language::from_code(code.trim());
            }
        }
        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|key| std::env::var(key).ok())
            .find(|value| !value.trim().is_empty())
            .map(|value| Language::from_code(&value))
            .unwrap_or(Language::English)
    }
}

/// Global language state
fn language_store() -> &'static Language {
    static STORE: OnceLock<Language> = OnceLock::new();
    STORE.get_or_init(|| {
        if cfg!(test) {
            // Unit tests assert on English strings.
            Language::English
        } else {
            Language::detect()
        }
    })
}

pub fn current_language() -> Language {
    *language_store()
}

/// Check if current language is Chinese
pub fn is_chinese() -> bool {
    current_language() == Language::Chinese
}

// ============================================================================
// Common UI Texts
// ============================================================================

pub mod texts {
    use super::is_chinese;

    // ============================================
    // GENERIC (通用)
    // ============================================

    pub fn cancelled() -> &'static str {
        if is_chinese() {
            "已取消"
        } else {
            "Cancelled"
        }
    }

    pub fn error_prefix() -> &'static str {
        if is_chinese() {
            "错误"
        } else {
            "Error"
        }
    }

    pub fn hint_prefix() -> &'static str {
        if is_chinese() {
            "提示"
        } else {
            "Hint"
        }
    }

    // ============================================
    // TABLE HEADERS (表格列)
    // ============================================

    pub fn header_name() -> &'static str {
        if is_chinese() {
            "名称"
        } else {
            "Name"
        }
    }

    pub fn header_display_name() -> &'static str {
        if is_chinese() {
            "显示名称"
        } else {
            "Display Name"
        }
    }

    pub fn header_type() -> &'static str {
        if is_chinese() {
            "类型"
        } else {
            "Type"
        }
    }

    pub fn header_model() -> &'static str {
        if is_chinese() {
            "模型"
        } else {
            "Model"
        }
    }

    pub fn header_status() -> &'static str {
        if is_chinese() {
            "状态"
        } else {
            "Status"
        }
    }

    pub fn header_url() -> &'static str {
        if is_chinese() {
            "地址"
        } else {
            "Base URL"
        }
    }

    pub fn header_api_key() -> &'static str {
        if is_chinese() {
            "API 密钥"
        } else {
            "API Key"
        }
    }

    pub fn header_key_url() -> &'static str {
        if is_chinese() {
            "获取密钥"
        } else {
            "Get Key"
        }
    }

    pub fn header_state_dir() -> &'static str {
        if is_chinese() {
            "状态目录"
        } else {
            "State Dir"
        }
    }

    pub fn kind_custom() -> &'static str {
        if is_chinese() {
            "自定义"
        } else {
            "custom"
        }
    }

    pub fn status_configured() -> &'static str {
        if is_chinese() {
            "✓ 已配置"
        } else {
            "✓ configured"
        }
    }

    pub fn status_unconfigured() -> &'static str {
        if is_chinese() {
            "✗ 未配置"
        } else {
            "✗ not configured"
        }
    }

    pub fn key_from_config() -> &'static str {
        if is_chinese() {
            "已保存"
        } else {
            "saved"
        }
    }

    pub fn key_from_env(var: &str) -> String {
        if is_chinese() {
            format!("来自环境变量 {var}")
        } else {
            format!("from ${var}")
        }
    }

    pub fn key_missing() -> &'static str {
        if is_chinese() {
            "未设置"
        } else {
            "not set"
        }
    }

    // ============================================
    // PROVIDER COMMANDS (供应商命令)
    // ============================================

    pub fn provider_added(name: &str) -> String {
        if is_chinese() {
            format!("✓ 已添加供应商 '{name}'")
        } else {
            format!("✓ Added provider '{name}'")
        }
    }

    pub fn provider_updated(name: &str) -> String {
        if is_chinese() {
            format!("✓ 已更新供应商 '{name}'")
        } else {
            format!("✓ Updated provider '{name}'")
        }
    }

    pub fn provider_removed(name: &str) -> String {
        if is_chinese() {
            format!("✓ 已删除供应商 '{name}'")
        } else {
            format!("✓ Removed provider '{name}'")
        }
    }

    pub fn state_dir_removed(path: &str) -> String {
        if is_chinese() {
            format!("  已删除状态目录 {path}")
        } else {
            format!("  Removed state directory {path}")
        }
    }

    pub fn confirm_remove(name: &str) -> String {
        if is_chinese() {
            format!("确定删除供应商 '{name}' 吗？")
        } else {
            format!("Remove provider '{name}'?")
        }
    }

    pub fn nothing_to_update() -> &'static str {
        if is_chinese() {
            "没有要修改的字段（使用 -k / -u / -m）"
        } else {
            "Nothing to update (use -k / -u / -m)"
        }
    }

    pub fn no_providers() -> &'static str {
        if is_chinese() {
            "没有可用的供应商"
        } else {
            "No providers available"
        }
    }

    pub fn no_configured_providers() -> &'static str {
        if is_chinese() {
            "还没有配置任何供应商。运行 'ccm init' 或 'ccm add' 开始。"
        } else {
            "No provider is configured yet. Run 'ccm init' or 'ccm add' to get started."
        }
    }

    pub fn providers_summary(configured: usize, total: usize) -> String {
        if is_chinese() {
            format!("共 {total} 个供应商，已配置 {configured} 个")
        } else {
            format!("{configured} of {total} provider(s) configured")
        }
    }

    pub fn current_default(name: &str) -> String {
        if is_chinese() {
            format!("当前默认供应商: {name}")
        } else {
            format!("Current default provider: {name}")
        }
    }

    pub fn no_default() -> &'static str {
        if is_chinese() {
            "尚未设置默认供应商"
        } else {
            "No default provider set"
        }
    }

    pub fn default_set(name: &str) -> String {
        if is_chinese() {
            format!("✓ 默认供应商已设置为 '{name}'")
        } else {
            format!("✓ Default provider set to '{name}'")
        }
    }

    pub fn default_set_unconfigured(name: &str, var: &str) -> String {
        if is_chinese() {
            format!("⚠ '{name}' 还没有 API 密钥，请运行 'ccm edit {name} -k <key>' 或设置 {var}")
        } else {
            format!("⚠ '{name}' has no API key yet; run 'ccm edit {name} -k <key>' or set {var}")
        }
    }

    // ============================================
    // RUN / SWITCH (启动)
    // ============================================

    pub fn launching(name: &str, display: &str, model: &str) -> String {
        if is_chinese() {
            format!("▶ 使用 {display} ({name}) 启动 Claude Code，模型 {model}")
        } else {
            format!("▶ Launching Claude Code with {display} ({name}), model {model}")
        }
    }

    pub fn select_provider_prompt() -> &'static str {
        if is_chinese() {
            "选择要启动的供应商："
        } else {
            "Select a provider to launch:"
        }
    }

    pub fn default_marker() -> &'static str {
        if is_chinese() {
            "（默认）"
        } else {
            " (default)"
        }
    }

    // ============================================
    // GENERATE (生成脚本)
    // ============================================

    pub fn script_written(path: &str) -> String {
        if is_chinese() {
            format!("✓ 已生成 {path}")
        } else {
            format!("✓ Generated {path}")
        }
    }

    pub fn script_failed(name: &str, err: &str) -> String {
        if is_chinese() {
            format!("✗ 生成 '{name}' 的脚本失败: {err}")
        } else {
            format!("✗ Failed to generate script for '{name}': {err}")
        }
    }

    pub fn no_scripts() -> &'static str {
        if is_chinese() {
            "没有保存了 API 密钥的供应商，未生成任何脚本"
        } else {
            "No provider has a saved API key; nothing to generate"
        }
    }

    pub fn scripts_path_hint(dir: &str) -> String {
        if is_chinese() {
            format!("将 {dir} 加入 PATH 即可直接运行 claude-<名称>")
        } else {
            format!("Add {dir} to PATH to run claude-<name> directly")
        }
    }

    // ============================================
    // TEST (连接测试)
    // ============================================

    pub fn testing_connection(name: &str, url: &str) -> String {
        if is_chinese() {
            format!("正在测试 {name} ({url}) ...")
        } else {
            format!("Testing {name} ({url}) ...")
        }
    }

    pub fn test_ok(name: &str, ms: u128, status: u16) -> String {
        if is_chinese() {
            format!("✓ {name} 连接成功 ({ms}ms, HTTP {status})")
        } else {
            format!("✓ {name} is reachable ({ms}ms, HTTP {status})")
        }
    }

    pub fn test_failed(name: &str, err: &str) -> String {
        if is_chinese() {
            format!("✗ {name} 连接失败: {err}")
        } else {
            format!("✗ {name} is unreachable: {err}")
        }
    }

    pub fn test_failed_summary(name: &str) -> String {
        if is_chinese() {
            format!("供应商 '{name}' 连接测试失败")
        } else {
            format!("connection test for '{name}' failed")
        }
    }

    pub fn probe_credential_hint() -> &'static str {
        if is_chinese() {
            "服务可达，但 API 密钥被拒绝 (401/403)，请检查密钥"
        } else {
            "Endpoint reachable, but the API key was rejected (401/403); check the key"
        }
    }

    // ============================================
    // INIT (初始化向导)
    // ============================================

    pub fn init_title() -> &'static str {
        if is_chinese() {
            "CCM 初始化"
        } else {
            "CCM setup"
        }
    }

    pub fn init_root(path: &str) -> String {
        if is_chinese() {
            format!("工作目录: {path}")
        } else {
            format!("Working directory: {path}")
        }
    }

    pub fn init_npm_found(path: &str) -> String {
        if is_chinese() {
            format!("✓ 找到 npm: {path}")
        } else {
            format!("✓ Found npm: {path}")
        }
    }

    pub fn init_npm_missing() -> &'static str {
        if is_chinese() {
            "⚠ 未找到 npm，请先安装 Node.js (https://nodejs.org)"
        } else {
            "⚠ npm not found; install Node.js first (https://nodejs.org)"
        }
    }

    pub fn init_agent_found(path: &str) -> String {
        if is_chinese() {
            format!("✓ 找到 Claude Code: {path}")
        } else {
            format!("✓ Found Claude Code: {path}")
        }
    }

    pub fn init_agent_missing(root: &str) -> String {
        if is_chinese() {
            format!(
                "⚠ 未找到 Claude Code，可运行: cd {root} && npm install @anthropic-ai/claude-code"
            )
        } else {
            format!(
                "⚠ Claude Code not found; install it with: cd {root} && npm install @anthropic-ai/claude-code"
            )
        }
    }

    pub fn init_select_preset() -> &'static str {
        if is_chinese() {
            "选择要配置的供应商："
        } else {
            "Choose a provider to configure:"
        }
    }

    pub fn init_key_hint(url: &str) -> String {
        if is_chinese() {
            format!("在这里获取 API 密钥: {url}")
        } else {
            format!("Get an API key at: {url}")
        }
    }

    pub fn init_api_key_prompt() -> &'static str {
        if is_chinese() {
            "API 密钥："
        } else {
            "API key:"
        }
    }

    pub fn init_set_default_prompt() -> &'static str {
        if is_chinese() {
            "设为默认供应商？"
        } else {
            "Make it the default provider?"
        }
    }

    pub fn init_done(name: &str) -> String {
        if is_chinese() {
            format!("✓ 完成！运行 'ccm run {name}' 或直接运行 'ccm' 打开管理界面")
        } else {
            format!("✓ Done! Run 'ccm run {name}', or just 'ccm' to open the manager")
        }
    }

    pub fn key_required() -> &'static str {
        if is_chinese() {
            "API 密钥不能为空"
        } else {
            "API key must not be empty"
        }
    }

    // ============================================
    // INTERACTIVE LIST (交互式列表)
    // ============================================

    pub fn interactive_select_provider() -> &'static str {
        if is_chinese() {
            "选择供应商："
        } else {
            "Select a provider:"
        }
    }

    pub fn interactive_choose_action(name: &str) -> String {
        if is_chinese() {
            format!("对 '{name}' 执行：")
        } else {
            format!("Action for '{name}':")
        }
    }

    pub fn action_run() -> &'static str {
        if is_chinese() {
            "▶ 启动"
        } else {
            "▶ Run"
        }
    }

    pub fn action_test() -> &'static str {
        if is_chinese() {
            "🔌 测试连接"
        } else {
            "🔌 Test connection"
        }
    }

    pub fn action_set_key() -> &'static str {
        if is_chinese() {
            "🔑 设置 API 密钥"
        } else {
            "🔑 Set API key"
        }
    }

    pub fn action_set_default() -> &'static str {
        if is_chinese() {
            "★ 设为默认"
        } else {
            "★ Set as default"
        }
    }

    pub fn action_remove() -> &'static str {
        if is_chinese() {
            "🗑 删除"
        } else {
            "🗑 Remove"
        }
    }

    pub fn action_back() -> &'static str {
        if is_chinese() {
            "← 返回"
        } else {
            "← Back"
        }
    }

    pub fn action_exit() -> &'static str {
        if is_chinese() {
            "退出"
        } else {
            "Exit"
        }
    }

    // ============================================
    // TUI (终端界面)
    // ============================================

    pub fn tui_app_title() -> &'static str {
        "CCM - Claude Code Manager"
    }

    pub fn tui_header_default(name: &str) -> String {
        if is_chinese() {
            format!("默认: {name} ")
        } else {
            format!("Default: {name} ")
        }
    }

    pub fn tui_header_no_default() -> &'static str {
        if is_chinese() {
            "未设置默认 "
        } else {
            "No default "
        }
    }

    pub fn tui_search_title() -> &'static str {
        if is_chinese() {
            "搜索"
        } else {
            "Search"
        }
    }

    pub fn tui_list_title(configured: usize, total: usize) -> String {
        if is_chinese() {
            format!("供应商 ({configured}/{total} 已配置)")
        } else {
            format!("Providers ({configured}/{total} configured)")
        }
    }

    pub fn tui_more_above() -> &'static str {
        if is_chinese() {
            "↑ 上方还有"
        } else {
            "↑ more above"
        }
    }

    pub fn tui_more_below() -> &'static str {
        if is_chinese() {
            "↓ 下方还有"
        } else {
            "↓ more below"
        }
    }

    pub fn tui_no_matches() -> &'static str {
        if is_chinese() {
            "没有匹配的供应商"
        } else {
            "No matching providers"
        }
    }

    pub fn tui_detail_title() -> &'static str {
        if is_chinese() {
            "详情"
        } else {
            "Details"
        }
    }

    pub fn tui_no_selection() -> &'static str {
        if is_chinese() {
            "未选择供应商"
        } else {
            "No provider selected"
        }
    }

    pub fn tui_kind_custom() -> &'static str {
        kind_custom()
    }

    pub fn tui_key_from_config() -> &'static str {
        if is_chinese() {
            "✓ 已保存"
        } else {
            "✓ saved"
        }
    }

    pub fn tui_key_from_env(var: &str) -> String {
        format!("✓ {}", key_from_env(var))
    }

    pub fn tui_key_missing() -> &'static str {
        if is_chinese() {
            "✗ 未设置"
        } else {
            "✗ not set"
        }
    }

    pub fn tui_label_name() -> &'static str {
        if is_chinese() {
            "名称"
        } else {
            "Name"
        }
    }

    pub fn tui_label_type() -> &'static str {
        if is_chinese() {
            "类型"
        } else {
            "Type"
        }
    }

    pub fn tui_label_model() -> &'static str {
        if is_chinese() {
            "模型"
        } else {
            "Model"
        }
    }

    pub fn tui_label_url() -> &'static str {
        if is_chinese() {
            "地址"
        } else {
            "URL"
        }
    }

    pub fn tui_label_key_url() -> &'static str {
        if is_chinese() {
            "获取密钥"
        } else {
            "Get Key"
        }
    }

    pub fn tui_label_api_key() -> &'static str {
        if is_chinese() {
            "密钥"
        } else {
            "API Key"
        }
    }

    pub fn tui_label_status() -> &'static str {
        if is_chinese() {
            "状态"
        } else {
            "Status"
        }
    }

    pub fn tui_status_not_tested() -> &'static str {
        if is_chinese() {
            "○ 未测试"
        } else {
            "○ Not tested"
        }
    }

    pub fn tui_status_testing() -> &'static str {
        if is_chinese() {
            "⟳ 测试中..."
        } else {
            "⟳ Testing..."
        }
    }

    pub fn tui_status_connected(ms: u128) -> String {
        if is_chinese() {
            format!("● 已连接 ({ms}ms)")
        } else {
            format!("● Connected ({ms}ms)")
        }
    }

    pub fn tui_status_error(msg: &str) -> String {
        if is_chinese() {
            format!("✗ 失败: {msg}")
        } else {
            format!("✗ Failed: {msg}")
        }
    }

    pub fn tui_key_keep_filter() -> &'static str {
        if is_chinese() {
            "保留筛选"
        } else {
            "keep filter"
        }
    }

    pub fn tui_key_clear_filter() -> &'static str {
        if is_chinese() {
            "清除"
        } else {
            "clear"
        }
    }

    pub fn tui_key_move() -> &'static str {
        if is_chinese() {
            "移动"
        } else {
            "move"
        }
    }

    pub fn tui_key_run() -> &'static str {
        if is_chinese() {
            "启动"
        } else {
            "run"
        }
    }

    pub fn tui_key_edit() -> &'static str {
        if is_chinese() {
            "编辑"
        } else {
            "edit"
        }
    }

    pub fn tui_key_test() -> &'static str {
        if is_chinese() {
            "测试"
        } else {
            "test"
        }
    }

    pub fn tui_key_default() -> &'static str {
        if is_chinese() {
            "设为默认"
        } else {
            "default"
        }
    }

    pub fn tui_key_remove() -> &'static str {
        if is_chinese() {
            "删除"
        } else {
            "remove"
        }
    }

    pub fn tui_key_search() -> &'static str {
        if is_chinese() {
            "搜索"
        } else {
            "search"
        }
    }

    pub fn tui_key_help() -> &'static str {
        if is_chinese() {
            "帮助"
        } else {
            "help"
        }
    }

    pub fn tui_key_quit() -> &'static str {
        if is_chinese() {
            "退出"
        } else {
            "quit"
        }
    }

    pub fn tui_footer_no_default_hint() -> &'static str {
        if is_chinese() {
            "按 d 设置默认供应商"
        } else {
            "press d to pick a default"
        }
    }

    pub fn tui_field_api_key() -> &'static str {
        if is_chinese() {
            "API 密钥"
        } else {
            "API Key"
        }
    }

    pub fn tui_field_base_url() -> &'static str {
        if is_chinese() {
            "接口地址"
        } else {
            "Base URL"
        }
    }

    pub fn tui_field_model() -> &'static str {
        if is_chinese() {
            "模型"
        } else {
            "Model"
        }
    }

    pub fn tui_error_key_required() -> &'static str {
        key_required()
    }

    pub fn tui_edit_title(name: &str) -> String {
        if is_chinese() {
            format!("编辑 {name}")
        } else {
            format!("Edit {name}")
        }
    }

    pub fn tui_edit_hint() -> &'static str {
        if is_chinese() {
            "Tab/↑↓ 切换字段  Enter 保存  Esc 取消"
        } else {
            "Tab/↑↓ switch field  Enter save  Esc cancel"
        }
    }

    pub fn tui_edit_key_url(url: &str) -> String {
        init_key_hint(url)
    }

    pub fn tui_help_title() -> &'static str {
        if is_chinese() {
            "快捷键"
        } else {
            "Keyboard Shortcuts"
        }
    }

    pub fn tui_help_close_hint() -> &'static str {
        if is_chinese() {
            "按 Esc / ? / q 关闭"
        } else {
            "Press Esc, ? or q to close"
        }
    }

    pub fn tui_help_sections() -> Vec<(&'static str, Vec<(&'static str, &'static str)>)> {
        if is_chinese() {
            vec![
                (
                    "导航",
                    vec![
                        ("↑/k ↓/j", "上下移动"),
                        ("g/Home G/End", "跳到首/尾"),
                        ("PgUp PgDn", "翻页"),
                        ("/", "搜索（Enter 保留，Esc 清除）"),
                    ],
                ),
                (
                    "操作",
                    vec![
                        ("Enter", "用所选供应商启动 Claude Code"),
                        ("e / a", "编辑密钥、地址、模型"),
                        ("t", "测试连接"),
                        ("d", "设为默认"),
                        ("r", "删除已保存的配置"),
                    ],
                ),
                (
                    "其他",
                    vec![
                        ("Ctrl+T", "切换深色/浅色主题"),
                        ("?", "显示帮助"),
                        ("q / Ctrl+C", "退出"),
                    ],
                ),
            ]
        } else {
            vec![
                (
                    "Navigation",
                    vec![
                        ("↑/k ↓/j", "Move up / down"),
                        ("g/Home G/End", "Jump to first / last"),
                        ("PgUp PgDn", "Page up / down"),
                        ("/", "Search (Enter keeps, Esc clears)"),
                    ],
                ),
                (
                    "Actions",
                    vec![
                        ("Enter", "Launch Claude Code with the selection"),
                        ("e / a", "Edit key, URL and model"),
                        ("t", "Test connection"),
                        ("d", "Set as default"),
                        ("r", "Remove saved config"),
                    ],
                ),
                (
                    "General",
                    vec![
                        ("Ctrl+T", "Toggle dark / light theme"),
                        ("?", "Show this help"),
                        ("q / Ctrl+C", "Quit"),
                    ],
                ),
            ]
        }
    }

    pub fn tui_confirm_yes() -> &'static str {
        if is_chinese() {
            "确定"
        } else {
            "Yes"
        }
    }

    pub fn tui_confirm_no() -> &'static str {
        if is_chinese() {
            "取消"
        } else {
            "No"
        }
    }

    pub fn tui_confirm_remove_title() -> &'static str {
        if is_chinese() {
            "删除供应商"
        } else {
            "Remove Provider"
        }
    }

    pub fn tui_confirm_remove_message(name: &str, display: &str) -> String {
        if is_chinese() {
            format!("删除供应商 '{name}' ({display})？\n这将删除它的配置。")
        } else {
            format!("Remove provider '{name}' ({display})?\nThis will delete the configuration.")
        }
    }

    pub fn tui_toast_no_selection() -> &'static str {
        if is_chinese() {
            "请先选择一个供应商"
        } else {
            "Select a provider first"
        }
    }

    pub fn tui_toast_not_saved(name: &str) -> String {
        if is_chinese() {
            format!("'{name}' 没有已保存的配置")
        } else {
            format!("'{name}' has no saved configuration")
        }
    }

    pub fn tui_toast_not_configured(name: &str) -> String {
        if is_chinese() {
            format!("'{name}' 还没有 API 密钥，按 e 设置")
        } else {
            format!("'{name}' has no API key yet; press e to set one")
        }
    }

    pub fn tui_toast_saved(name: &str) -> String {
        if is_chinese() {
            format!("✓ 已保存 '{name}'")
        } else {
            format!("✓ Saved '{name}'")
        }
    }

    pub fn tui_toast_removed(name: &str) -> String {
        if is_chinese() {
            format!("✓ 已删除 '{name}'")
        } else {
            format!("✓ Removed '{name}'")
        }
    }

    pub fn tui_toast_default_set(name: &str) -> String {
        if is_chinese() {
            format!("★ 默认供应商: {name}")
        } else {
            format!("★ Default provider: {name}")
        }
    }

    pub fn tui_toast_default_set_unconfigured(name: &str) -> String {
        if is_chinese() {
            format!("★ 默认供应商: {name}（尚未配置密钥）")
        } else {
            format!("★ Default provider: {name} (no API key yet)")
        }
    }

    pub fn tui_toast_probe_unavailable(err: &str) -> String {
        if is_chinese() {
            format!("连接测试不可用: {err}")
        } else {
            format!("Connection tests unavailable: {err}")
        }
    }

    pub fn tui_probe_disabled() -> &'static str {
        if is_chinese() {
            "连接测试不可用"
        } else {
            "connection tests are unavailable"
        }
    }
}
