use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::Config;

pub fn init(config: &Config) {
    subscriber(config.log_directive(), std::io::stdout).init();
}

pub fn subscriber<W>(directive: &str, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(directive)
        .with_writer(writer)
        .finish()
}
