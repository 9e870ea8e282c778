use todo_client::TodoRpc;
use todo_core::config::DEFAULT_BASE_URL;
use todo_core::CreateTodoInput;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logging();

    let rpc = TodoRpc::new(DEFAULT_BASE_URL);
    let response = rpc.create_todo().mutate(&CreateTodoInput {
        title: "hello world".to_string(),
        description: "welcome to world of programming".to_string(),
    })?;

    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
