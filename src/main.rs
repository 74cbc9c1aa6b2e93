use chrono::{DateTime, TimeZone, Utc};
use clap::{App, Arg, ArgMatches};
use serde_json::Value;
use std::error::Error;
use std::process;

use firebase_token::constants::UID_CLAIM;
use firebase_token::{ClaimMap, IssuedToken, Output, TokenBuilder, TokenOptions};

mod helpers;
use helpers::logging::{init_logging, LogFormat};
use helpers::print_output::print_output;

fn main() {
    init_logging(LogFormat::from_env());

    let matches = App::new("Firebase Custom Token Generator")
        .version("1.0")
        .about("Issues signed Firebase custom authentication tokens")
        .arg(
            Arg::with_name("secret")
                .help("Firebase secret used to sign the token")
                .short("s")
                .long("secret")
                .env("FIREBASE_SECRET")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::with_name("claims")
                .help("Custom claims as a JSON object")
                .short("c")
                .long("claims")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("uid")
                .help("User id, overrides any uid in --claims")
                .short("u")
                .long("uid")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("issued-at")
                .help("Issue time in seconds since the epoch (default: now)")
                .long("issued-at")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("expires-at")
                .help("Expiry in seconds since the epoch (default: issue time + 24h)")
                .long("expires-at")
                .takes_value(true),
        )
        .arg(Arg::with_name("admin").help("Grant admin access").long("admin"))
        .arg(Arg::with_name("debug").help("Enable debug output from security rules").long("debug"))
        .arg(
            Arg::with_name("max-claims-len")
                .help("Largest accepted encoded claim segment, in characters")
                .long("max-claims-len")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("format")
                .help("The output format (text, json)")
                .short("f")
                .long("format")
                .takes_value(true)
                .default_value("text"),
        )
        .get_matches();

    let format = matches.value_of("format").unwrap_or("text");

    let output = match run(&matches) {
        Ok(issued) => Output {
            status: "issued".to_string(),
            token: Some(issued.token),
            detail: "Token issued".to_string(),
            claims: Some(issued.claims),
        },
        Err(e) => Output {
            status: "error".to_string(),
            token: None,
            detail: e.to_string(),
            claims: None,
        },
    };

    let failed = output.status == "error";
    print_output(format, output);
    if failed {
        process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<IssuedToken, Box<dyn Error>> {
    let secret = matches.value_of("secret").unwrap_or_default();

    let mut claims: ClaimMap = match matches.value_of("claims") {
        Some(raw) => serde_json::from_str(raw)?,
        None => ClaimMap::new(),
    };
    if let Some(uid) = matches.value_of("uid") {
        claims.insert(UID_CLAIM.to_string(), Value::String(uid.to_string()));
    }

    let options = TokenOptions::new(
        parse_timestamp(matches.value_of("issued-at"))?,
        parse_timestamp(matches.value_of("expires-at"))?,
        matches.is_present("admin"),
        matches.is_present("debug"),
    );

    let mut builder = TokenBuilder::new(secret);
    if let Some(max) = matches.value_of("max-claims-len") {
        builder = builder.with_max_encoded_claims_len(max.parse()?);
    }

    Ok(builder.issue(Some(&claims), Some(&options))?)
}

fn parse_timestamp(raw: Option<&str>) -> Result<Option<DateTime<Utc>>, Box<dyn Error>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let secs: i64 = raw.parse()?;
    let instant = Utc
        .timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| format!("timestamp out of range: {}", raw))?;
    Ok(Some(instant))
}
