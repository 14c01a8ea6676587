use std::cell::RefCell;
use std::collections::VecDeque;

use chess::Color;
use chess_agent::agent::{AgentError, AgentPlayer, ChatProvider};
use chess_agent::models::{
    AssistantMessage, ChatRequest, FunctionCall, SessionConfig, TerminationReason, ToolCall,
};
use chess_agent::session::{Session, PROMPT};

/// Replays a fixed script of assistant messages; once the script runs dry it
/// answers with contentless replies, which burn the agent's round cap.
struct ScriptedProvider {
    script: RefCell<VecDeque<AssistantMessage>>,
}

impl ScriptedProvider {
    fn new(script: Vec<AssistantMessage>) -> Self {
        ScriptedProvider {
            script: RefCell::new(script.into()),
        }
    }
}

impl ChatProvider for ScriptedProvider {
    fn complete(&self, _request: &ChatRequest) -> Result<AssistantMessage, AgentError> {
        Ok(self.script.borrow_mut().pop_front().unwrap_or_default())
    }
}

/// Fails the test if the session ever invokes the agent.
struct UnreachableProvider;

impl ChatProvider for UnreachableProvider {
    fn complete(&self, _request: &ChatRequest) -> Result<AssistantMessage, AgentError> {
        panic!("the agent must not be invoked");
    }
}

fn submit_call(move_text: &str) -> AssistantMessage {
    AssistantMessage {
        content: None,
        tool_calls: vec![ToolCall {
            id: "call-1".to_string(),
            kind: "function".to_string(),
            function: FunctionCall {
                name: "submit_move".to_string(),
                arguments: format!(r#"{{"move": "{}"}}"#, move_text),
            },
        }],
    }
}

fn session_with_script(
    agent_color: Color,
    script: Vec<AssistantMessage>,
) -> Session<ScriptedProvider> {
    let config = SessionConfig {
        agent_color,
        round_cap: 3,
    };
    Session::new(config, AgentPlayer::new(ScriptedProvider::new(script), "test"))
}

fn run_session<P: ChatProvider>(
    session: &mut Session<P>,
    script: &[u8],
) -> (TerminationReason, String) {
    let mut input = script;
    let mut output = Vec::new();
    let reason = session.run(&mut input, &mut output).unwrap();
    (reason, String::from_utf8(output).unwrap())
}

#[test]
fn human_white_opens_and_agent_replies() {
    let mut session = session_with_script(Color::Black, vec![submit_call("e7e5")]);
    let (reason, output) = run_session(&mut session, b"e4\nquit\n");

    assert_eq!(reason, TerminationReason::UserQuit);
    assert_eq!(session.arbiter().move_history(), ["e2e4", "e7e5"]);
    assert!(output.contains("Agent plays e7e5."));
}

#[test]
fn help_lists_legal_moves_without_consuming_a_ply() {
    let mut session = session_with_script(Color::Black, vec![]);
    let (_, output) = run_session(&mut session, b"help\nquit\n");

    // All twenty opening moves are shown and none was played.
    assert!(output.contains("Legal moves: "));
    assert!(output.contains("e2e4"));
    assert!(output.contains("g1f3"));
    assert!(session.arbiter().move_history().is_empty());
}

#[test]
fn illegal_input_reprompts_without_state_change() {
    let mut session = session_with_script(Color::Black, vec![submit_call("e7e5")]);
    let (_, output) = run_session(&mut session, b"e9\ne4\nquit\n");

    assert!(output.contains("illegal move: e9"));
    // The bad line cost a prompt but not a ply.
    assert_eq!(session.arbiter().move_history()[0], "e2e4");
}

#[test]
fn quit_never_reaches_the_agent() {
    let config = SessionConfig {
        agent_color: Color::Black,
        round_cap: 3,
    };
    let mut session = Session::new(config, AgentPlayer::new(UnreachableProvider, "test"));
    let (reason, _) = run_session(&mut session, b"quit\n");

    assert_eq!(reason, TerminationReason::UserQuit);
    assert!(session.arbiter().move_history().is_empty());
}

#[test]
fn eof_on_input_counts_as_quit() {
    let mut session = session_with_script(Color::Black, vec![]);
    let (reason, _) = run_session(&mut session, b"");
    assert_eq!(reason, TerminationReason::UserQuit);
}

#[test]
fn checkmate_stops_the_session_immediately() {
    let mut session = session_with_script(
        Color::Black,
        vec![submit_call("e7e5"), submit_call("d8h4")],
    );
    let (reason, output) = run_session(&mut session, b"f3\ng4\n");

    assert_eq!(
        reason,
        TerminationReason::Checkmate(Color::Black)
    );
    assert_eq!(session.arbiter().move_history().len(), 4);
    assert!(output.contains("Game over: checkmate, black wins."));
    // Two human turns, so exactly two prompts; none after the mate.
    assert_eq!(output.matches(PROMPT).count(), 2);
}

#[test]
fn agent_fallback_keeps_the_session_alive() {
    // Agent opens as white but its provider never submits a move.
    let mut session = session_with_script(Color::White, vec![]);
    let (reason, output) = run_session(&mut session, b"quit\n");

    assert_eq!(reason, TerminationReason::UserQuit);
    assert_eq!(session.arbiter().move_history().len(), 1);
    assert!(output.contains("Agent plays "));
}
