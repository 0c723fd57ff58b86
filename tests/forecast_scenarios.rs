//! End-to-end forecasting scenarios through the public library API.

mod common;

use std::sync::Arc;

use grid_load_forecaster::domain::round1;
use grid_load_forecaster::forecast::{
    ForecastError, ForecastRequest, LoadFeatures, LoadForecaster, TimeCursor,
};
use grid_load_forecaster::ml::LinearLoadModel;

use common::fixture;

fn load(name: &str) -> LinearLoadModel {
    LinearLoadModel::load(&fixture(name)).unwrap()
}

#[test]
fn passthrough_model_holds_initial_load() {
    let forecaster = LoadForecaster::new(Arc::new(load("passthrough_model.json")));
    let request = ForecastRequest {
        horizon: 3,
        temperatures: &[36.0, 12.0, -4.0],
        humidities: &[10.0, 95.0, 50.0],
        initial_load_mw: 1000.0,
    };

    let out = forecaster.forecast(&request, TimeCursor::new(17, 3)).unwrap();
    assert_eq!(
        out.iter().collect::<Vec<_>>(),
        vec![(1, 1000.0), (2, 1000.0), (3, 1000.0)]
    );
}

#[test]
fn trained_export_matches_unrounded_reference_chain() {
    let model = load("trained_export_model.json");
    let forecaster = LoadForecaster::new(Arc::new(model.clone()));
    let temps = [33.8, 33.1];
    let hums = [71.0, 74.0, 77.0];
    let start = TimeCursor::new(22, 6);

    let out = forecaster
        .forecast(
            &ForecastRequest {
                horizon: 24,
                temperatures: &temps,
                humidities: &hums,
                initial_load_mw: 2800.0,
            },
            start,
        )
        .unwrap();

    let mut previous = 2800.0;
    let mut cursor = start;
    for step in 1..=24u32 {
        let i = (step - 1) as usize;
        let features = LoadFeatures::new(cursor, previous, temps[i.min(1)], hums[i.min(2)]);
        let expected = model.predict(&features.to_array());
        assert_eq!(out.get(step), Some(round1(expected)), "step {step}");
        previous = expected;
        cursor.advance();
    }
    assert_eq!(out.horizon(), 24);
}

#[test]
fn forecast_depends_on_anchor_time() {
    let forecaster = LoadForecaster::new(Arc::new(load("trained_export_model.json")));
    let request = ForecastRequest {
        horizon: 6,
        temperatures: &[32.0],
        humidities: &[75.0],
        initial_load_mw: 2800.0,
    };

    let weekday_morning = forecaster.forecast(&request, TimeCursor::new(8, 1)).unwrap();
    let weekend_night = forecaster.forecast(&request, TimeCursor::new(23, 5)).unwrap();
    assert_ne!(weekday_morning, weekend_night);
}

#[test]
fn empty_weather_is_rejected_before_forecasting() {
    let forecaster = LoadForecaster::new(Arc::new(load("passthrough_model.json")));
    let request = ForecastRequest {
        horizon: 4,
        temperatures: &[],
        humidities: &[],
        initial_load_mw: 2800.0,
    };

    assert_eq!(
        forecaster.forecast(&request, TimeCursor::new(0, 0)),
        Err(ForecastError::EmptyWeatherSeries {
            series: "temperature"
        })
    );
}
