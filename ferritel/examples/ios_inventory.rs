//! Inventory example: collect facts and interface status from IOS switches
//!
//! Logs into each device in turn, enters enable mode and prints device facts
//! and the interface table as JSON. Credentials that work (or that were typed
//! in) are carried over to the next device.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example ios_inventory -- --user admin,backup --password s3cret,0ld \
//!     --enable en4ble --power 10.0.0.1 10.0.0.2
//! ```

use std::env;

use ferritel::{Credentials, SessionBuilder};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (set RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut credentials = Credentials::from_delimited(
        args.user.as_deref(),
        args.password.as_deref(),
        args.enable.as_deref(),
    );

    for host in &args.hosts {
        let mut session = match SessionBuilder::new(host)
            .credentials(credentials.clone())
            .debug(args.debug)
            .connect()
            .await
        {
            Ok(session) => session,
            Err(e) => {
                eprintln!("[!] {}: {}", host, e);
                continue;
            }
        };

        if !args.no_enable {
            if let Err(e) = session.escalate().await {
                eprintln!("[!] {}: {}", host, e);
                if e.is_fatal_for_device() {
                    continue;
                }
            }
        }

        credentials = session.credentials().clone();

        if let Err(e) = session.disable_paging().await {
            eprintln!("[!] {}: {}", host, e);
            continue;
        }

        match session.get_facts().await {
            Ok(facts) => println!("{}", serde_json::to_string_pretty(&facts)?),
            Err(e) => eprintln!("[!] {}: {}", host, e),
        }

        match session.get_interface_status(args.description, args.power).await {
            Ok(table) => println!("{}", serde_json::to_string_pretty(&table)?),
            Err(e) => {
                eprintln!("[!] {}: {}", host, e);
                if e.is_fatal_for_device() {
                    continue;
                }
            }
        }

        session.close().await?;
    }

    Ok(())
}

/// Simple argument parser (avoiding external dependencies)
struct Args {
    hosts: Vec<String>,
    user: Option<String>,
    password: Option<String>,
    enable: Option<String>,
    no_enable: bool,
    description: bool,
    power: bool,
    debug: bool,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut parsed = Self {
            hosts: Vec::new(),
            user: None,
            password: None,
            enable: None,
            no_enable: false,
            description: false,
            power: false,
            debug: false,
        };

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--user" | "-u" => {
                    i += 1;
                    parsed.user = args.get(i).cloned();
                }
                "--password" | "-P" => {
                    i += 1;
                    parsed.password = args.get(i).cloned();
                }
                "--enable" | "-e" => {
                    i += 1;
                    parsed.enable = args.get(i).cloned();
                }
                "--no-enable" => parsed.no_enable = true,
                "--description" => parsed.description = true,
                "--power" => parsed.power = true,
                "--debug" => parsed.debug = true,
                "--help" => {
                    Self::print_help();
                    std::process::exit(0);
                }
                host => parsed.hosts.push(host.to_string()),
            }
            i += 1;
        }

        parsed
    }

    fn print_help() {
        println!(
            r#"ferritel ios_inventory example

USAGE:
    cargo run --example ios_inventory -- [OPTIONS] <HOST>...

OPTIONS:
    -u, --user <LIST>        Comma-separated usernames
    -P, --password <LIST>    Comma-separated passwords (same count as usernames)
    -e, --enable <LIST>      Comma-separated enable passwords
    --no-enable              Stay in user mode
    --description            Fetch untruncated interface descriptions
    --power                  Fetch PoE draw per interface
    --debug                  Log all Telnet traffic
    --help                   Print this help message
"#
        );
    }
}
