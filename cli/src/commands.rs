use std::io::Write;
use std::path::Path;
use std::time::Duration;

use relink_act_core::wire::{EnterArea, LoadParty};
use relink_act_core::{CombatMeter, MeterConfigExt, MeterService, MockCombatData};
use relink_act_types::{CombatData, MeterConfig};

use crate::render;

/// Stream snapshots from the live endpoint until Ctrl-C.
pub async fn watch(config: MeterConfig, json: bool) -> Result<(), String> {
    let endpoint = config.endpoint_url();
    let (service, handle) = MeterService::new(config);
    let task = tokio::spawn(service.run());

    handle
        .on(move |data: &CombatData| {
            let mut stdout = std::io::stdout().lock();
            if json {
                writeln!(stdout, "{}", serde_json::to_string(data)?)?;
            } else {
                writeln!(stdout, "{}", render::combat_table(data))?;
            }
            Ok(())
        })
        .await
        .map_err(|e| e.to_string())?;

    if !json {
        handle
            .on(|enter: &EnterArea| {
                writeln!(std::io::stdout(), "-- area changed at {} ms", enter.timestamp_ms)?;
                Ok(())
            })
            .await
            .map_err(|e| e.to_string())?;
        handle
            .on(|party: &LoadParty| {
                write!(std::io::stdout(), "-- party loaded\n{}", render::party_roster(party))?;
                Ok(())
            })
            .await
            .map_err(|e| e.to_string())?;
    }

    eprintln!("watching {endpoint}, press Ctrl-C to stop");
    tokio::signal::ctrl_c().await.map_err(|e| e.to_string())?;

    handle.shutdown().await.map_err(|e| e.to_string())?;
    task.await.map_err(|e| e.to_string())?;
    Ok(())
}

/// Feed newline-delimited payloads through a meter and print the active combat.
pub async fn replay(path: &Path, config: &MeterConfig, json: bool) -> Result<(), String> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;

    let mut meter = CombatMeter::new(config);
    let mut accepted = 0usize;
    let mut dropped = 0usize;
    for (line_no, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match meter.handle_payload(line) {
            Ok(()) => accepted += 1,
            Err(e) => {
                dropped += 1;
                tracing::warn!(line = line_no + 1, error = %e, "dropping payload");
            }
        }
    }

    let mut stdout = std::io::stdout().lock();
    let combat = meter.current_combat();
    if json {
        let out = serde_json::to_string_pretty(&combat).map_err(|e| e.to_string())?;
        writeln!(stdout, "{out}").map_err(|e| e.to_string())?;
        return Ok(());
    }

    write!(stdout, "{}", render::replay_summary(meter.ledger(), accepted, dropped))
        .map_err(|e| e.to_string())?;
    match combat {
        Some(data) => write!(stdout, "{}", render::combat_table(&data)),
        None => writeln!(stdout, "no combat with damage"),
    }
    .map_err(|e| e.to_string())
}

/// Print mock snapshots once per second.
pub async fn mock(seconds: u64, json: bool) -> Result<(), String> {
    let mut generator = MockCombatData::new();
    generator.start(Duration::from_secs(1), move |data| {
        let Some(line) = render::snapshot_line(&data, json) else {
            return;
        };
        if let Err(e) = writeln!(std::io::stdout(), "{line}") {
            tracing::warn!(error = %e, "failed to write mock snapshot");
        }
    });

    // Land just after the last snapshot
    tokio::time::sleep(Duration::from_secs(seconds) + Duration::from_millis(100)).await;
    generator.stop();
    Ok(())
}

pub fn show_config(config: &MeterConfig, save: bool) -> Result<(), String> {
    let mut stdout = std::io::stdout().lock();
    let rendered = serde_json::to_string_pretty(config).map_err(|e| e.to_string())?;
    writeln!(stdout, "{rendered}").map_err(|e| e.to_string())?;

    if save {
        config.save().map_err(|e| e.to_string())?;
        if let Some(path) = MeterConfig::config_path() {
            writeln!(stdout, "saved to {}", path.display()).map_err(|e| e.to_string())?;
        }
    }
    Ok(())
}
