use crate::data_fetcher::models::GameStatus;
use crate::data_fetcher::models::scoreboard::Status;

/// Maps an upstream status block onto [`GameStatus`].
///
/// The `state` field (`pre` / `in` / `post`) decides when present. Without it
/// the description is used: `Scheduled` and anything starting with `Final`
/// are recognized, and every other description counts as in progress, since
/// the feed uses several live sub-statuses (`Halftime`, `End of Period`,
/// `Delayed`, ...). Returns `None` when neither field is present.
///
/// # Examples
///
/// ```rust
/// use nfl_scoreboard::data_fetcher::models::GameStatus;
/// use nfl_scoreboard::data_fetcher::models::scoreboard::{Status, StatusType};
/// use nfl_scoreboard::data_fetcher::processors::determine_game_status;
///
/// let status = Status {
///     kind: Some(StatusType {
///         description: Some("Halftime".to_string()),
///         ..Default::default()
///     }),
///     ..Default::default()
/// };
/// assert_eq!(determine_game_status(&status), Some(GameStatus::InProgress));
/// ```
pub fn determine_game_status(status: &Status) -> Option<GameStatus> {
    let kind = status.kind.as_ref()?;

    let from_state = kind.state.as_deref().and_then(|state| match state {
        "pre" => Some(GameStatus::Scheduled),
        "in" => Some(GameStatus::InProgress),
        "post" => Some(GameStatus::Final),
        _ => None,
    });
    if from_state.is_some() {
        return from_state;
    }

    let description = kind.description.as_deref()?.trim();
    let game_status = if description.eq_ignore_ascii_case("scheduled") {
        GameStatus::Scheduled
    } else if description.to_ascii_lowercase().starts_with("final") {
        GameStatus::Final
    } else {
        GameStatus::InProgress
    };

    tracing::trace!("Status description '{description}' classified as {game_status:?}");
    Some(game_status)
}

/// Upstream description, falling back to the coarse label
pub fn status_detail(status: &Status, game_status: GameStatus) -> String {
    status
        .kind
        .as_ref()
        .and_then(|kind| kind.description.clone())
        .unwrap_or_else(|| game_status.to_string())
}
