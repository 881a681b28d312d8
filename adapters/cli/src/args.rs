use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use snaze_core::{GameConfig, Strategy, VisitedPolicy};

/// Autonomous snake that eats its way through maze levels.
#[derive(Debug, Parser)]
#[command(name = "snaze", version)]
pub(crate) struct Args {
    /// Level file holding one or more level blocks.
    #[arg(value_name = "LEVEL_FILE")]
    pub(crate) level_file: PathBuf,

    /// Frames per second. Valid range = [1, 50]. Default = 12.
    #[arg(long)]
    fps: Option<u32>,

    /// Lives the snake starts with. Valid range = [1, 20]. Default = 5.
    #[arg(long, visible_alias = "l")]
    lives: Option<u32>,

    /// Food to eat per level. Valid range = [1, 20]. Default = 10.
    #[arg(long)]
    food: Option<u32>,

    /// Snake intelligence: random or backtracking. Default = backtracking.
    #[arg(
        long = "playertype",
        visible_aliases = ["player", "p"],
        value_name = "TYPE"
    )]
    player: Option<Strategy>,

    /// Deduplicate search states on the whole body instead of head and heading.
    #[arg(long)]
    strict_search: bool,

    /// Seed for food placement and random moves.
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file with default options; flags take precedence.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Draw with ASCII symbols only.
    #[arg(long)]
    pub(crate) ascii: bool,

    /// Never wait for <ENTER> between levels and after crashes.
    #[arg(long)]
    pub(crate) autoplay: bool,
}

impl Args {
    /// Merges defaults, the optional config file and flags, then validates the result.
    pub(crate) fn resolve_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                toml::from_str(&text)
                    .with_context(|| format!("failed to parse config file {}", path.display()))?
            }
            None => GameConfig::default(),
        };

        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut GameConfig) {
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if let Some(lives) = self.lives {
            config.lives = lives;
        }
        if let Some(food) = self.food {
            config.food_per_level = food;
        }
        if let Some(player) = self.player {
            config.strategy = player;
        }
        if self.strict_search {
            config.visited = VisitedPolicy::FullBody;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snaze_core::ConfigError;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("snaze").chain(args.iter().copied()))
            .expect("arguments parse")
    }

    #[test]
    fn defaults_apply_without_flags() {
        let args = parse(&["levels.txt"]);
        assert_eq!(args.level_file, PathBuf::from("levels.txt"));
        assert!(!args.autoplay);
        assert_eq!(args.resolve_config().expect("valid"), GameConfig::default());
    }

    #[test]
    fn flags_override_defaults() {
        let args = parse(&[
            "levels.txt",
            "--fps",
            "30",
            "--lives",
            "2",
            "--food",
            "4",
            "--playertype",
            "Random",
            "--strict-search",
            "--seed",
            "9",
        ]);
        let config = args.resolve_config().expect("valid");
        assert_eq!(config.fps, 30);
        assert_eq!(config.lives, 2);
        assert_eq!(config.food_per_level, 4);
        assert_eq!(config.strategy, Strategy::Random);
        assert_eq!(config.visited, VisitedPolicy::FullBody);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn player_alias_is_accepted() {
        let args = parse(&["levels.txt", "--player", "backtracking"]);
        assert_eq!(
            args.resolve_config().expect("valid").strategy,
            Strategy::Backtracking
        );
    }

    #[test]
    fn short_long_aliases_set_lives_and_player() {
        let config = parse(&["levels.txt", "--l", "3", "--p", "random"])
            .resolve_config()
            .expect("valid");
        assert_eq!(config.lives, 3);
        assert_eq!(config.strategy, Strategy::Random);
    }

    #[test]
    fn unknown_player_type_is_a_parse_error() {
        let result = Args::try_parse_from(["snaze", "levels.txt", "--playertype", "greedy"]);
        assert!(result.is_err());
    }

    #[test]
    fn missing_level_file_is_a_parse_error() {
        assert!(Args::try_parse_from(["snaze"]).is_err());
    }

    #[test]
    fn out_of_range_values_fail_validation() {
        let error = parse(&["levels.txt", "--fps", "60"])
            .resolve_config()
            .expect_err("fps above range");
        assert_eq!(
            error.downcast_ref::<ConfigError>(),
            Some(&ConfigError::OutOfRange {
                field: "fps",
                value: 60,
                min: 1,
                max: 50,
            })
        );
    }

    #[test]
    fn unreadable_config_file_is_reported() {
        let error = parse(&["levels.txt", "--config", "/nonexistent/snaze.toml"])
            .resolve_config()
            .expect_err("missing config");
        assert!(error.to_string().contains("failed to read config file"));
    }
}
