use crate::cli::ui::highlight;

pub fn execute() {
    println!("{} {}", highlight("ccm"), env!("CARGO_PKG_VERSION"));
    println!("target: {}/{}", std::env::consts::OS, std::env::consts::ARCH);
    if let Some(commit) = option_env!("CCM_BUILD_COMMIT") {
        println!("commit: {commit}");
    }
}
