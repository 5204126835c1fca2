use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Lower/upper minute thresholds for the green / amber / red agent ratings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingThresholds {
    pub good: f64,
    pub warn: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub fr_sla_minutes: f64,
    pub fr_sla_extended_minutes: f64,
    pub tr_sla_minutes: f64,
    /// Inclusive hour window of the heatmaps and the per-hour FR series.
    pub heatmap_hour_start: u8,
    pub heatmap_hour_end: u8,
    pub pareto_display_limit: usize,
    pub pareto_threshold_pct: u32,
    pub top_clients_limit: usize,
    pub top_tabulations_by_month: usize,
    pub fr_rating: RatingThresholds,
    pub tr_rating: RatingThresholds,
    pub anonymize_agents: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            fr_sla_minutes: 5.0,
            fr_sla_extended_minutes: 15.0,
            tr_sla_minutes: 240.0,
            heatmap_hour_start: 8,
            heatmap_hour_end: 16,
            pareto_display_limit: 15,
            pareto_threshold_pct: 80,
            top_clients_limit: 10,
            top_tabulations_by_month: 5,
            fr_rating: RatingThresholds {
                good: 30.0,
                warn: 60.0,
            },
            tr_rating: RatingThresholds {
                good: 120.0,
                warn: 300.0,
            },
            anonymize_agents: false,
        }
    }
}

impl AppConfig {
    /// Parses a (possibly partial) JSON document; absent keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<AppConfig, AppError> {
        let config: AppConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.heatmap_hour_end > 23 || self.heatmap_hour_start > self.heatmap_hour_end {
            return Err(AppError::InvalidConfig(format!(
                "janela de horas inválida: {}..={}",
                self.heatmap_hour_start, self.heatmap_hour_end
            )));
        }
        for (name, value) in [
            ("frSlaMinutes", self.fr_sla_minutes),
            ("frSlaExtendedMinutes", self.fr_sla_extended_minutes),
            ("trSlaMinutes", self.tr_sla_minutes),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AppError::InvalidConfig(format!("{name} inválido: {value}")));
            }
        }
        if self.fr_sla_minutes > self.fr_sla_extended_minutes {
            return Err(AppError::InvalidConfig(
                "frSlaMinutes maior que frSlaExtendedMinutes".into(),
            ));
        }
        for (name, r) in [("frRating", self.fr_rating), ("trRating", self.tr_rating)] {
            if r.good > r.warn {
                return Err(AppError::InvalidConfig(format!(
                    "{name}: limite verde ({}) acima do limite amarelo ({})",
                    r.good, r.warn
                )));
            }
        }
        if self.pareto_threshold_pct > 100 {
            return Err(AppError::InvalidConfig(format!(
                "paretoThresholdPct fora de 0..=100: {}",
                self.pareto_threshold_pct
            )));
        }
        Ok(())
    }

    pub fn heatmap_hours(&self) -> std::ops::RangeInclusive<u8> {
        self.heatmap_hour_start..=self.heatmap_hour_end
    }
}

pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, AppError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    let config = AppConfig::from_json_str(&json)?;
    log::info!("Loaded configuration from {}", path.display());
    Ok(config)
}
