#[tokio::main]
async fn main() {
    ssm_config_editor::cli::start().await;
}
