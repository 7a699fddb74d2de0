use std::{sync::Arc, time::SystemTime};

use ikebana::*;

// Define two services, one depending on the other

#[derive(Default)]
struct Logger;

impl Logger {
    fn log(&self, content: &str) {
        println!("{content}");
    }
}

construct_default!(Logger);

struct DateLogger {
    logger: Arc<Logger>,
}

impl DateLogger {
    fn log_date(&self) {
        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .expect("clock before epoch");
        self.logger.log(&format!("{}s since epoch", now.as_secs()));
    }
}

impl Construct for DateLogger {
    fn parameters() -> Vec<ParamSpec> {
        vec![ParamSpec::class("logger", "demo::Logger")]
    }
    fn construct(mut args: Arguments) -> Result<Self, ContainerError> {
        Ok(Self {
            logger: args.take("logger")?,
        })
    }
}

fn main() -> Result<(), ContainerError> {
    // Declare the constructible types
    let mut catalog = TypeCatalog::new();
    catalog
        .declare::<Logger>("demo::Logger")
        .declare::<DateLogger>("demo::DateLogger");

    // Create a container sharing instances by default and resolve by alias
    let container = Container::with_services(
        ContainerConfig {
            all_shared_by_default: true,
            ..Default::default()
        },
        Arc::new(catalog),
        [ServiceConfig::new("demo::DateLogger")?.with_alias("date_logger")?],
    )?;

    let date_logger: Arc<DateLogger> = container.get_as("date_logger")?;
    date_logger.log_date();

    Ok(())
}
