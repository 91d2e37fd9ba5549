use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use moodmeal_core::Config;
use moodmeal_recipes::{MoodSymbol, OrchestrationController, RecipeView};
use moodmeal_weather::{FixedLocation, LocatedWeather, WeatherProvider};

/// Weather- and mood-matched recipe suggestions
#[derive(Parser, Debug)]
#[command(name = "moodmeal")]
#[command(about = "Pick a mood, get recipes that fit the weather")]
#[command(version)]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Moods to run, in order: 🥳 😌 🤔 or excited, calm, reflective
    #[arg(required = true, value_name = "MOOD")]
    moods: Vec<MoodSymbol>,
}

fn print_view(view: &RecipeView) {
    match view {
        RecipeView::Results(outcome) => {
            let vibe = outcome
                .vibe
                .as_ref()
                .map_or("(none)", |v| v.as_str());
            println!("\nMood {}  Vibe: {}", outcome.mood, vibe);
            if let Some(v) = &outcome.vibe {
                let dishes = v.suggested_dishes();
                if !dishes.is_empty() {
                    println!("  Think: {}", dishes.join(", "));
                }
            }
            for recipe in &outcome.recipes {
                print!("  - {}", recipe.title);
                if let Some(minutes) = recipe.ready_in_minutes {
                    print!(" ({} min)", minutes);
                }
                if let Some(score) = recipe.score {
                    print!(" score {:.0}", score);
                }
                println!();
                if let Some(url) = &recipe.source_url {
                    println!("    {}", url);
                }
            }
        }
        RecipeView::NoMatches(outcome) => {
            println!("\nMood {}", outcome.mood);
            println!("  {}", view.message().unwrap_or_default());
        }
        RecipeView::Loading { .. } | RecipeView::Idle => {}
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    moodmeal_core::init()?;

    let cli = Cli::parse();
    let (config, _) = Config::load_validated(cli.config.as_deref())?;

    let controller = Arc::new(OrchestrationController::from_config(&config)?);

    let provider = WeatherProvider::new(&config.weather)?;
    let weather_source = LocatedWeather::new(provider, FixedLocation::from_config(&config.weather));
    let weather = controller.refresh_weather(&weather_source).await;

    match (weather.condition(), weather.temperature) {
        (Some(condition), Some(temp)) => {
            let band = weather.temperature_band().map_or("", |b| b.label());
            println!("Weather: {} {:.1}° {}", condition, temp, band);
        }
        _ => println!(
            "Weather unavailable ({}), using any-weather recipes",
            weather.error.as_deref().unwrap_or("unknown")
        ),
    }

    for mood in cli.moods {
        controller.select_mood(mood).await;
        print_view(&controller.view());
    }

    controller.shutdown();
    tracing::info!("MoodMeal finished");

    Ok(())
}
