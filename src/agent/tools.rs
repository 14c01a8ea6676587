use log::info;
use serde::Deserialize;
use serde_json::json;

use crate::game::arbiter::MoveArbiter;
use crate::game::utils::render_board;
use crate::models::{Seat, ToolDef};

/// The designated mutation tool; calling it successfully ends the turn.
pub const SUBMIT_MOVE: &str = "submit_move";

/// The capability set handed to the agent each turn.
pub fn tool_defs() -> Vec<ToolDef> {
    let no_args = json!({"type": "object", "properties": {}});
    vec![
        ToolDef::function(
            "get_legal_moves",
            "List every legal move in the current position, in coordinate notation.",
            no_args.clone(),
        ),
        ToolDef::function(
            "get_possible_captures",
            "List the legal moves that capture an opposing piece.",
            no_args.clone(),
        ),
        ToolDef::function(
            "get_possible_checks",
            "List the legal moves that put the opponent in check.",
            no_args.clone(),
        ),
        ToolDef::function(
            "get_move_history",
            "List every move played so far, in order.",
            no_args.clone(),
        ),
        ToolDef::function(
            "is_my_turn",
            "Report whether it is currently your turn.",
            no_args.clone(),
        ),
        ToolDef::function("get_board", "Show the current board from your side.", no_args),
        ToolDef::function(
            SUBMIT_MOVE,
            "Play a move. Ends your turn if the move is legal.",
            json!({
                "type": "object",
                "properties": {
                    "move": {
                        "type": "string",
                        "description": "The move to play, e.g. e2e4 or Nf3."
                    }
                },
                "required": ["move"]
            }),
        ),
    ]
}

/// Result of dispatching one tool call.
pub struct ToolOutcome {
    /// Text returned to the model as the tool result.
    pub reply: String,
    /// The committed ply, in canonical notation, if this call moved a piece.
    pub committed: Option<String>,
}

impl ToolOutcome {
    fn reply(reply: impl Into<String>) -> Self {
        ToolOutcome {
            reply: reply.into(),
            committed: None,
        }
    }
}

#[derive(Deserialize)]
struct SubmitMoveArgs {
    #[serde(rename = "move")]
    move_text: String,
}

/// Run one tool call against the arbiter on behalf of the agent seat.
/// Rejections come back as tool output for the model, never as errors.
pub fn dispatch(arbiter: &mut MoveArbiter, name: &str, arguments: &str) -> ToolOutcome {
    match name {
        "get_legal_moves" => ToolOutcome::reply(list_reply(arbiter.legal_moves())),
        "get_possible_captures" => ToolOutcome::reply(list_reply(arbiter.possible_captures())),
        "get_possible_checks" => ToolOutcome::reply(list_reply(arbiter.possible_checks())),
        "get_move_history" => ToolOutcome::reply(list_reply(arbiter.move_history().to_vec())),
        "is_my_turn" => ToolOutcome::reply(arbiter.is_current_turn(Seat::Agent).to_string()),
        "get_board" => ToolOutcome::reply(render_board(
            &arbiter.current_position(),
            arbiter.color_of(Seat::Agent),
        )),
        SUBMIT_MOVE => submit(arbiter, arguments),
        _ => ToolOutcome::reply(format!("unknown tool: {}", name)),
    }
}

fn submit(arbiter: &mut MoveArbiter, arguments: &str) -> ToolOutcome {
    let args: SubmitMoveArgs = match serde_json::from_str(arguments) {
        Ok(args) => args,
        Err(e) => return ToolOutcome::reply(format!("bad arguments: {}", e)),
    };
    match arbiter.apply_move(Seat::Agent, &args.move_text) {
        Ok(()) => {
            let played = arbiter
                .move_history()
                .last()
                .cloned()
                .unwrap_or_else(|| args.move_text.clone());
            info!("agent played {}", played);
            ToolOutcome {
                reply: format!("played {}", played),
                committed: Some(played),
            }
        }
        Err(e) => ToolOutcome::reply(e.to_string()),
    }
}

fn list_reply(items: Vec<String>) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(" ")
    }
}
