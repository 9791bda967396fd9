// src/bin/cafe_scout.rs
// DOCUMENTATION: Terminal client for a running cafe-finder
// PURPOSE: Search a list of places and print a summary table

use anyhow::{bail, Context, Result};
use dotenv::dotenv;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::process;
use std::time::{Duration, Instant};

// --- ANSI colors ---
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const CYAN: &str = "\x1b[36m";

const DEFAULT_PLACES: [&str; 5] = ["Paris", "London", "Madrid", "Berlin", "Rome"];

#[derive(Serialize)]
struct SearchPayload<'a> {
    session: &'a str,
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    radius: Option<u32>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct LocationInfo {
    display_name: String,
}

#[derive(Deserialize, Debug, Default)]
struct AmenityInfo {
    #[serde(default)]
    wifi: bool,
}

#[derive(Deserialize, Debug)]
struct CafeInfo {
    name: String,
    distance: u32,
    #[serde(default)]
    amenities: AmenityInfo,
}

#[derive(Deserialize, Debug)]
struct SearchResult {
    location: LocationInfo,
    cafes: Vec<CafeInfo>,
    total: usize,
}

#[derive(Debug)]
struct ScoutResult {
    place: String,
    success: bool,
    resolved: String,
    cafes: usize,
    nearest: Option<(String, u32)>,
    with_wifi: usize,
    duration_secs: f64,
}

struct CafeScout {
    base_url: String,
    radius: Option<u32>,
    client: Client,
    results: Vec<ScoutResult>,
}

impl CafeScout {
    fn new(base_url: String, radius: Option<u32>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url,
            radius,
            client,
            results: Vec::new(),
        })
    }

    async fn check_service_health(&self) -> bool {
        match self.client.get(format!("{}/health", self.base_url)).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    async fn search(&self, place: &str) -> Result<SearchResult> {
        let url = format!("{}/cafes/search", self.base_url);
        let payload = SearchPayload {
            session: "cafe-scout",
            query: place,
            radius: self.radius,
        };

        let response = self.client.post(&url).json(&payload).send().await?;

        if response.status().is_success() {
            response
                .json::<SearchResult>()
                .await
                .context("Failed to parse response JSON")
        } else {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            bail!("HTTP {} - {}", status, body)
        }
    }

    async fn run(&mut self, places: &[String]) -> Result<()> {
        println!("\n{}🔍 Checking service status...{}", CYAN, RESET);
        if !self.check_service_health().await {
            println!("{}❌ Service unavailable at {}.{}", RED, self.base_url, RESET);
            println!("{}Please ensure cafe-finder is running (cargo run){}", YELLOW, RESET);
            process::exit(1);
        }
        println!("{}✅ Service available{}\n", GREEN, RESET);

        self.print_header(places.len());

        for (i, place) in places.iter().enumerate() {
            let start_time = Instant::now();
            println!("{}[{}/{}] Searching ☕ near {}...{}", CYAN, i + 1, places.len(), place, RESET);

            let response = self.search(place).await;
            let duration = start_time.elapsed().as_secs_f64();

            match response {
                Ok(resp) => {
                    // Results come back nearest first
                    let nearest = resp.cafes.first().map(|c| (c.name.clone(), c.distance));
                    let with_wifi = resp.cafes.iter().filter(|c| c.amenities.wifi).count();

                    println!(
                        "{}✅ {}: {} cafés ({:.1}s){}",
                        GREEN, resp.location.display_name, resp.total, duration, RESET
                    );
                    self.results.push(ScoutResult {
                        place: place.clone(),
                        success: true,
                        resolved: resp.location.display_name,
                        cafes: resp.total,
                        nearest,
                        with_wifi,
                        duration_secs: duration,
                    });
                }
                Err(err) => {
                    println!("{}❌ Error searching {}: {}{}", RED, place, err, RESET);
                    self.results.push(ScoutResult {
                        place: place.clone(),
                        success: false,
                        resolved: String::new(),
                        cafes: 0,
                        nearest: None,
                        with_wifi: 0,
                        duration_secs: duration,
                    });
                }
            }

            // The server paces the geocoder; stay well under its rate
            tokio::time::sleep(Duration::from_millis(1100)).await;
        }

        self.print_summary();
        Ok(())
    }

    fn print_header(&self, total_count: usize) {
        println!("{}╔══════════════════════════════════════════════════════════════╗{}", CYAN, RESET);
        println!("{}║   ☕  Cafe Scout                                              ║{}", CYAN, RESET);
        println!("{}╚══════════════════════════════════════════════════════════════╝{}", CYAN, RESET);
        match self.radius {
            Some(radius) => println!("\n{}📊 Places to search: {} (radius {} m){}", BOLD, total_count, radius, RESET),
            None => println!("\n{}📊 Places to search: {}{}", BOLD, total_count, RESET),
        }
    }

    fn print_summary(&self) {
        println!("\n\n{}📋 Search Summary{}", BOLD, RESET);
        println!("──────────────────────────────────────────────────────────────────────────────");
        println!(
            "{:<20} {:<8} {:>6} {:>6} {:<28} {:>8}",
            "Place", "Status", "Cafés", "WiFi", "Nearest", "Duration"
        );
        println!("──────────────────────────────────────────────────────────────────────────────");

        let mut total_cafes = 0;
        let mut total_wifi = 0;
        let mut total_duration = 0.0;
        let mut failures = 0;

        for res in &self.results {
            let status_icon = if res.success { "✅" } else { "❌" };
            let nearest = match &res.nearest {
                Some((name, distance)) => format!("{} ({} m)", truncate(name, 20), distance),
                None => "-".to_string(),
            };
            println!(
                "{:<20} {:<8} {:>6} {:>6} {:<28} {:>7.1}s",
                truncate(&res.place, 20),
                status_icon,
                res.cafes,
                res.with_wifi,
                nearest,
                res.duration_secs
            );

            if res.success {
                total_cafes += res.cafes;
                total_wifi += res.with_wifi;
            } else {
                failures += 1;
            }
            total_duration += res.duration_secs;
        }

        println!("──────────────────────────────────────────────────────────────────────────────");
        if failures == 0 {
            println!("\n{}✨ All searches completed{}", GREEN, RESET);
        } else {
            println!("\n{}⚠️  {} of {} searches failed{}", YELLOW, failures, self.results.len(), RESET);
        }
        println!("{}📊 Totals:{}", BOLD, RESET);
        println!("  • Cafés found: {}{}{}", GREEN, total_cafes, RESET);
        println!("  • With WiFi: {}{}{}", BLUE, total_wifi, RESET);
        println!("  • Total Duration: {:.1}s", total_duration);

        for res in self.results.iter().filter(|r| r.success && r.resolved != r.place) {
            println!("  • {} → {}", res.place, res.resolved);
        }
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let base_url = env::var("CAFE_FINDER_URL").unwrap_or_else(|_| "http://localhost:8003".to_string());
    let radius = match env::var("SCOUT_RADIUS_M") {
        Ok(value) => Some(
            value
                .parse::<u32>()
                .with_context(|| format!("SCOUT_RADIUS_M is not a number: {}", value))?,
        ),
        Err(_) => None,
    };

    let mut places: Vec<String> = env::args().skip(1).collect();
    if places.is_empty() {
        places = DEFAULT_PLACES.iter().map(|p| p.to_string()).collect();
    }

    let mut scout = CafeScout::new(base_url.trim_end_matches('/').to_string(), radius)?;
    scout.run(&places).await
}
