use clap::Parser;
use lupusec_xt::{Generation, PanelClient};

/// Print panel condition, history and sensors of a Lupusec XT1/XT2 panel.
#[derive(Parser, Debug)]
#[command(name = "report")]
struct Args {
    /// Username for the panel web UI
    #[arg(short, long, env = "LUPUSEC_USER")]
    username: String,

    /// Password for the panel web UI
    #[arg(short, long, env = "LUPUSEC_PASSWORD", hide_env_values = true)]
    password: String,

    /// Panel address, e.g. https://192.168.1.20
    #[arg(short, long, env = "LUPUSEC_ADDRESS")]
    address: String,

    /// Panel generation: 1 or 2
    #[arg(short = 'x', long = "xt-version", env = "LUPUSEC_XT")]
    generation: Generation,

    /// Accept self-signed certificates
    #[arg(long)]
    no_ssl_verify: bool,

    #[arg(long)]
    history: bool,

    #[arg(long)]
    sensors: bool,

    #[arg(long)]
    alarm_panel: bool,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let (protocol, host) = match args.address.split_once("://") {
        Some((proto, host)) => (proto.to_string(), host.to_string()),
        None => ("https".to_string(), args.address.clone()),
    };

    let mut client = PanelClient::builder(host, args.generation)
        .protocol(&protocol)
        .credentials(&args.username, &args.password)
        .verify_tls(!args.no_ssl_verify)
        .build()?;

    let report_all = !(args.alarm_panel || args.history || args.sensors);

    if args.alarm_panel || report_all {
        client.refresh_condition().await?;
        println!("--- Panel conditions ({}) ---", client.generation());
        if args.json {
            println!("{}", serde_json::to_string_pretty(client.condition())?);
        } else {
            for area in client.area_states() {
                match area.area {
                    Some(n) => println!("Area {n}: {:?}", area.mode),
                    None => println!("Mode: {:?}", area.mode),
                }
            }
            let cond = client.condition();
            println!("Battery: {:?}, Tamper: {:?}", cond.battery, cond.tamper);
        }
        println!();
    }

    if args.history || report_all {
        client.refresh_history().await?;
        println!("--- History ---");
        if args.json {
            println!("{}", serde_json::to_string_pretty(client.history())?);
        } else {
            for entry in client.history() {
                println!("{entry}");
            }
        }
        println!();
    }

    if args.sensors || report_all {
        client.refresh_sensors().await?;
        println!("--- Sensors ---");
        let devices = client.devices().sorted();
        if args.json {
            println!("{}", serde_json::to_string_pretty(&devices)?);
        } else {
            for device in &devices {
                println!("ID: {}, {device}", device.key);
            }
            let active = devices
                .iter()
                .filter(|d| d.status.is_some_and(|s| s.is_open_or_on()))
                .count();
            println!("{active} of {} sensors open or on", devices.len());
        }
        println!();
    }

    Ok(())
}
