//! The mcli executable opens an interactive shell on a memcached-style server:
//!
//! `mcli [HOST[:PORT]] [PORT] [--timeout SECS] [--read-timeout SECS] [--chunk-size BYTES] [-v]`
//!
//!     Connect to HOST:PORT (default localhost:11211) and read commands from standard input.
//!     A non-numeric PORT prints "port invalid" and exits with a non-zero code.
//!     If the connection cannot be established, "connect timeout" or "unknown error: ..." is
//!     printed and the process exits with code 1.
//!
//! Inside the shell:
//!
//!     get <key>                         fetch a value
//!     set <key> <value> [flags] [ttl]   store a value
//!     add <key> <value> [flags] [ttl]   store a value if the key does not exist
//!     del <key>                         delete a key
//!     stats [group]                     show server statistics
//!     keys <pattern> [bound]            list keys matching a glob pattern, `*` matches 1+ chars
//!     flush <pattern>                   delete every key matching a glob pattern
//!     quit | exit                       leave the shell
//!
//! `mcli -V`
//!
//!     Print the version.

use std::io::{self, BufRead, Read, Write};
use std::process::exit;
use std::time::Duration;

use clap::{crate_version, App, Arg, ArgMatches};
use mcli::{ClientConfig, Command, McClient, McError, Result, DEFAULT_HOST, DEFAULT_PORT};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

/// ['Opt'] holds parsed and validated options from the command line
#[derive(Debug)]
struct Opt {
    /// the server's host:port
    addr: String,
    config: ClientConfig,
}

impl Opt {
    /// validates the host, port and tuning parameters
    /// returns `Ok<Opt>` if everything is valid
    /// # Errors
    /// returns [`McError::Parsing`] if one of the parameters is invalid
    ///
    fn build(matches: &ArgMatches) -> Result<Opt> {
        let (host, port) = match (matches.value_of("HOST"), matches.value_of("PORT")) {
            (None, _) => (DEFAULT_HOST, None),
            (Some(host), Some(port)) => (host, Some(port)),
            (Some(host_port), None) => match host_port.split_once(':') {
                Some((host, port)) => (host, Some(port)),
                None => (host_port, None),
            },
        };
        let port: u16 = match port {
            Some(port) => port
                .parse()
                .map_err(|_| McError::Parsing("port invalid".to_string()))?,
            None => DEFAULT_PORT,
        };

        let mut config = ClientConfig::default();
        if let Some(secs) = matches.value_of("timeout") {
            config.connect_timeout = parse_secs("timeout", secs)?;
        }
        if let Some(secs) = matches.value_of("read-timeout") {
            config.read_timeout = Some(parse_secs("read-timeout", secs)?);
        }
        if let Some(bytes) = matches.value_of("chunk-size") {
            config.chunk_size = match bytes.parse() {
                Ok(n) if n > 0 => n,
                _ => return Err(McError::Parsing(format!("invalid chunk size: {}", bytes))),
            };
        }

        Ok(Opt {
            addr: format!("{}:{}", host, port),
            config,
        })
    }
}

fn main() {
    let matches = App::new("mcli")
        .version(crate_version!())
        .author("strohs <strohs1@gmail.com>")
        .about("an interactive client for memcached-style cache servers")
        .arg(Arg::with_name("HOST")
            .index(1)
            .help("the server to connect to, as HOST or HOST:PORT"))
        .arg(Arg::with_name("PORT")
            .index(2)
            .help("the server port, when not given as part of HOST"))
        .arg(Arg::with_name("timeout")
            .long("timeout")
            .value_name("SECS")
            .help("seconds to wait for the connection to be established")
            .default_value("5"))
        .arg(Arg::with_name("read-timeout")
            .long("read-timeout")
            .value_name("SECS")
            .help("seconds to wait for reply data before a command fails")
            .takes_value(true))
        .arg(Arg::with_name("chunk-size")
            .long("chunk-size")
            .value_name("BYTES")
            .help("bytes requested per read while receiving a reply")
            .default_value("256"))
        .arg(Arg::with_name("verbose")
            .short("v")
            .long("verbose")
            .help("log protocol traffic to STDERR"))
        .get_matches();

    // configure a subscriber that will log messages to STDERR
    subscriber_config(matches.is_present("verbose"));

    let opt = match Opt::build(&matches) {
        Ok(opt) => opt,
        Err(err) => {
            eprintln!("{}", err);
            exit(2);
        }
    };
    debug!(?opt);

    if !run(opt) {
        exit(1);
    }
}

/// connects to the server and runs the shell until the user quits.
/// returns `false` if the connection could not be established
fn run(opt: Opt) -> bool {
    let connected = match McClient::connect(opt.addr.as_str(), &opt.config) {
        Ok(mut client) => {
            if let Err(e) = shell(&mut client, &opt.addr) {
                eprintln!("error: {}", e);
            }
            true
        }
        Err(McError::Timeout(_)) => {
            println!("connect timeout");
            false
        }
        Err(McError::Unclassified(msg)) => {
            println!("unknown error: {}", msg);
            false
        }
        Err(e) => {
            println!("unknown error: {}", e);
            false
        }
    };
    println!("Connection closed, Bye.");
    connected
}

/// reads commands from STDIN and executes them on `client`, one at a time.
/// A failed command is reported and the shell keeps going
fn shell<S: Read + Write>(client: &mut McClient<S>, addr: &str) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();
    loop {
        print!("({}) > ", addr);
        io::stdout().flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            println!();
            return Ok(());
        }

        let params: Vec<&str> = line.split_whitespace().collect();
        let (name, args) = match params.split_first() {
            Some((name, args)) => (*name, args),
            None => continue,
        };
        if name.eq_ignore_ascii_case("quit") || name.eq_ignore_ascii_case("exit") {
            return Ok(());
        }

        match name.parse::<Command>() {
            Ok(cmd) => match cmd.execute(client, args) {
                Ok(output) => println!("{}", output),
                Err(e) => println!("error: {}", e),
            },
            Err(e) => println!("{}", e),
        }
    }
}

fn parse_secs(name: &str, secs: &str) -> Result<Duration> {
    match secs.parse::<u64>() {
        Ok(n) if n > 0 => Ok(Duration::from_secs(n)),
        _ => Err(McError::Parsing(format!("invalid {}: {}", name, secs))),
    }
}

/// configures a tracing subscriber that will log to STDERR
fn subscriber_config(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        // events at `level` or more severe are written out
        .with_max_level(level)
        // log to stderr instead of stdout, stdout belongs to the shell
        .with_writer(std::io::stderr)
        // completes the builder.
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting tracing default subscriber failed");
}
