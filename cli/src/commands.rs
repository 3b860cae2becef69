//! Console command handlers.
//!
//! Each handler applies one change through the [`Controller`] and prints the
//! outcome. Bad values are reported on stdout rather than returned; the
//! console keeps running either way.

use std::time::Duration;

use reticle_core::{MouseButton, Rgb};

use crate::controller::Controller;
use crate::sim::SimulatedKeys;

pub async fn toggle_crosshair(controller: &Controller) {
    match controller.toggle_crosshair().await {
        Ok(true) => println!("crosshair on"),
        Ok(false) => println!("crosshair off"),
        Err(e) => println!("failed to toggle crosshair: {e}"),
    }
}

pub async fn set_size(controller: &Controller, value: u32) {
    controller.set_size(value).await;
    // Echo the stored value so out-of-range input shows what it clamped to.
    println!("size set to {}", controller.status().crosshair.size);
}

pub async fn set_thickness(controller: &Controller, value: u32) {
    controller.set_thickness(value).await;
    println!(
        "thickness set to {}",
        controller.status().crosshair.thickness
    );
}

pub async fn set_color(controller: &Controller, value: &str) {
    match value.parse::<Rgb>() {
        Ok(color) => {
            controller.set_color(color).await;
            println!("color set to {color}");
        }
        Err(e) => println!("{e}"),
    }
}

pub async fn set_rgb_cycle(controller: &Controller, state: &str) {
    match parse_switch(state) {
        Ok(enabled) => {
            controller.set_rgb_cycle(enabled).await;
            println!("rgb cycle {}", if enabled { "on" } else { "off" });
        }
        Err(e) => println!("{e}"),
    }
}

pub async fn set_fade(controller: &Controller, state: &str) {
    match parse_switch(state) {
        Ok(enabled) => {
            controller.set_fade(enabled).await;
            println!("fade {}", if enabled { "on" } else { "off" });
        }
        Err(e) => println!("{e}"),
    }
}

pub async fn toggle_clicker(controller: &Controller) {
    if controller.toggle_auto_clicker().await {
        println!("auto-clicker on");
    } else {
        println!("auto-clicker off");
    }
}

pub async fn set_delay(controller: &Controller, seconds: f64) {
    controller.set_delay(seconds);
    println!(
        "click delay set to {}s",
        controller.status().clicker.delay_seconds
    );
}

pub async fn set_button(controller: &Controller, value: &str) {
    match MouseButton::from_name(value) {
        Some(button) => {
            controller.set_button(button);
            println!("click button set to {}", button.name());
        }
        None => println!("unknown button '{value}' (expected left, right or middle)"),
    }
}

pub fn press(keys: &SimulatedKeys, key: &str, hold_ms: u64) {
    keys.press(key, Duration::from_millis(hold_ms));
    println!("holding {} for {}ms", key.to_ascii_uppercase(), hold_ms);
}

pub fn status(controller: &Controller) {
    println!("{}", controller.status());
}

pub fn quit() {
    println!("quitting...");
}

/// Parse an on/off argument.
pub fn parse_switch(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "on" => Ok(true),
        "off" => Ok(false),
        other => Err(format!("expected 'on' or 'off', got '{other}'")),
    }
}
