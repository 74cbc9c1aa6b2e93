use chrono::{TimeZone, Utc};
use colored::*;
use firebase_token::types::output::Output;

fn decode_timestamp(timestamp: i64) -> String {
    match Utc.timestamp_opt(timestamp, 0).single() {
        Some(utc) => utc.format("%Y-%m-%d %H:%M:%S (UTC)").to_string(),
        None => "out of range".to_string(),
    }
}

pub fn print_output(format: &str, output: Output) {
    match format {
        "json" => match serde_json::to_string(&output) {
            Ok(json_output) => println!("{}", json_output),
            Err(e) => eprintln!("{} Could not serialize output: {}", "[!]".red(), e),
        },
        _ => match output.status.as_str() {
            "issued" => {
                println!("{} {}", "[+]".green(), output.detail.green());
                if let Some(token) = output.token {
                    println!("{}", token);
                }
                if let Some(claims) = output.claims {
                    println!("\n{}", "Token claims:".yellow());
                    println!("[+] v = {}", claims.v.to_string().bright_blue());
                    match &claims.sub {
                        Some(sub) => println!("[+] sub = \"{}\"", sub.bright_blue()),
                        None => println!("[-] sub = {}", "(none, admin token)".yellow()),
                    }
                    for (field, label, value) in [
                        ("iat", "IssuedAt", claims.iat),
                        ("nbf", "NotBefore", claims.nbf),
                        ("exp", "Expires", claims.exp),
                    ] {
                        println!(
                            "[+] {} = {}    ==> {} = {}",
                            field,
                            value.to_string().bright_blue(),
                            label,
                            decode_timestamp(value).bright_blue()
                        );
                    }
                    println!("[+] admin = {}", claims.admin.to_string().bright_blue());
                    println!("[+] debug = {}", claims.debug.to_string().bright_blue());
                    for (key, value) in &claims.d {
                        println!("[+] d.{} = {}", key, value.to_string().bright_blue());
                    }
                }
            }
            "error" => {
                println!("\n{} Could not issue token: {}", "[!]".red(), output.detail.red());
            }
            _ => {}
        },
    }
}
