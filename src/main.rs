use clap::Parser;
use ccm_lib::cli::commands::{init, provider, run as run_cmd, test, version};
use ccm_lib::cli::i18n::texts;
use ccm_lib::cli::{Cli, Commands};
use ccm_lib::{AppError, ProviderPatch, ProvidersConfig};
use std::process;

fn main() {
    // 解析命令行参数
    let cli = Cli::parse();

    // 默认只显示错误日志，避免干扰命令输出和 TUI
    let log_level = if cli.verbose { "debug" } else { "error" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    ccm_lib::cli::ui::apply_inquire_theme();

    match run(cli) {
        Ok(()) => {}
        Err(AppError::Cancelled) => println!("{}", texts::cancelled()),
        Err(e) => {
            eprintln!("{}: {}", texts::error_prefix(), e);
            if let Some(hint) = e.suggestion() {
                eprintln!("{}: {}", texts::hint_prefix(), hint);
            }
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        None => {
            // 终端已在 tui::run 返回前恢复
            let Some(name) = ccm_lib::cli::tui::run()? else {
                return Ok(());
            };
            let config = ProvidersConfig::load()?;
            run_cmd::launch(&config, &name, Vec::new())
        }
        Some(Commands::Add {
            name,
            key,
            url,
            model,
            display_name,
            force,
        }) => provider::add(provider::AddArgs {
            name,
            key,
            url,
            model,
            display_name,
            force,
        }),
        Some(Commands::Edit {
            name,
            key,
            url,
            model,
        }) => provider::edit(
            &name,
            ProviderPatch {
                api_key: key,
                base_url: url,
                model,
            },
        ),
        Some(Commands::Remove { name, force }) => provider::remove(&name, force),
        Some(Commands::List { interactive }) => {
            if interactive {
                ccm_lib::cli::interactive::run()
            } else {
                provider::list()
            }
        }
        Some(Commands::Show { name }) => provider::show(&name),
        Some(Commands::Test { name }) => test::execute(&name),
        Some(Commands::Default { name }) => provider::default(name),
        Some(Commands::Run { name, args }) => run_cmd::run(name, args),
        Some(Commands::Switch) => run_cmd::switch(),
        Some(Commands::Generate) => run_cmd::generate(),
        Some(Commands::Init) => init::execute(),
        Some(Commands::Version) => {
            version::execute();
            Ok(())
        }
        Some(Commands::Completions { shell }) => {
            ccm_lib::cli::generate_completions(shell);
            Ok(())
        }
    }
}
