use clap::Parser;
use log::info;
use zigbee_quirks::device::air_quality;

/// Inspect the built-in device quirks.
#[derive(Parser)]
#[command(name = "zigbee-quirks", version, about)]
struct Args {
    /// Print the device descriptor as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();
    let args = Args::parse();

    let descriptor = match air_quality::device_descriptor() {
        Ok(descriptor) => descriptor,
        Err(e) => {
            log::error!("Descriptor build failed: {e}");
            std::process::exit(1);
        }
    };

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&descriptor).expect("descriptor serializes")
        );
        return;
    }

    info!("Device: {} / {}", descriptor.manufacturer(), descriptor.model());

    for binding in descriptor.endpoint_bindings() {
        info!(
            "  Endpoint {} <- cluster 0x{:04X}",
            binding.endpoint_id, binding.cluster_id
        );
    }

    for entity in descriptor.entities() {
        match entity.unit {
            Some(unit) => info!(
                "  [{}] {} ({}, {})",
                entity.kind, entity.unique_key, entity.fallback_name, unit
            ),
            None => info!(
                "  [{}] {} ({})",
                entity.kind, entity.unique_key, entity.fallback_name
            ),
        }
    }

    for request in descriptor.subscription_requests() {
        info!(
            "  Reporting: endpoint {} cluster 0x{:04X} attribute 0x{:04X}, every {}-{}s, delta {}",
            request.endpoint_id,
            request.cluster_id,
            request.attribute_id,
            request.min_interval,
            request.max_interval,
            request.reportable_change
        );
    }
}
