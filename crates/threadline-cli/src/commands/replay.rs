use crate::collaborators::{LoggingMedia, ScriptedEngine, StaticEphemerals};
use crate::script::{ReplayScript, Step};
use anyhow::Result;
use serde::Serialize;
use serde_json::{Value, json};
use std::path::Path;
use std::sync::Arc;
use threadline_application::{DisplaySettings, SessionCollaborators, TimelineSession, TimelineView};
use threadline_core::config::TimelineConfig;
use threadline_core::message::ApproxTokenCounter;
use threadline_infrastructure::{ConfigService, InMemoryConversationRepository};

#[derive(Debug, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub action: &'static str,
    pub outcome: Value,
}

/// Everything a replay produced, printed as JSON.
#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub steps: Vec<StepReport>,
    /// Views captured by `render` steps.
    pub renders: Vec<TimelineView>,
    pub branches: Vec<String>,
    pub final_view: TimelineView,
}

pub async fn execute(script_path: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = match config_path {
        Some(path) => ConfigService::with_path(path).get_config()?,
        None => ConfigService::new().get_config()?,
    };
    let script = ReplayScript::load(script_path)?;

    let report = run(script, config).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Plays `script` against an in-memory copy of its conversation.
pub async fn run(script: ReplayScript, config: TimelineConfig) -> Result<ReplayReport> {
    let repository = Arc::new(InMemoryConversationRepository::with_conversations([
        script.conversation(),
    ]));
    let engine = Arc::new(ScriptedEngine::new(script.replies.clone()));
    let display = Arc::new(DisplaySettings::new(config.show_system_messages));
    let media = Arc::new(LoggingMedia);

    let collaborators = SessionCollaborators {
        execution_engine: engine.clone(),
        branch_creator: repository.clone(),
        speech_engine: media.clone(),
        image_engine: media.clone(),
        capabilities: Arc::new(script.capabilities),
        preferences_navigator: media.clone(),
        ephemeral_source: Arc::new(StaticEphemerals::new(
            script.conversation_id.clone(),
            script.ephemerals.clone(),
        )),
        display_preferences: display.clone(),
        token_counter: Arc::new(ApproxTokenCounter),
        diagram_requester: Some(media),
    };

    let mut session = TimelineSession::open(
        &script.conversation_id,
        repository.as_ref(),
        collaborators,
        config,
    )
    .await?;
    engine.attach(session.store());

    tracing::info!(
        "[Replay] {} steps against {}",
        script.steps.len(),
        script.conversation_id
    );

    let mut steps = Vec::with_capacity(script.steps.len());
    let mut renders = Vec::new();
    for (index, step) in script.steps.iter().enumerate() {
        let outcome = match step {
            Step::Render => {
                renders.push(session.render().await);
                json!({ "render": renders.len() - 1 })
            }
            _ => apply(&mut session, &display, step).await?,
        };
        tracing::debug!("[Replay] step {} {}: {}", index, step.name(), outcome);
        steps.push(StepReport {
            index,
            action: step.name(),
            outcome,
        });
    }

    Ok(ReplayReport {
        steps,
        renders,
        branches: repository.branches_of(&script.conversation_id).await,
        final_view: session.render().await,
    })
}

async fn apply(
    session: &mut TimelineSession,
    display: &DisplaySettings,
    step: &Step,
) -> Result<Value> {
    let dispatcher = session.dispatcher();
    let outcome = match step {
        Step::Branch { message_id } => serde_json::to_value(dispatcher.branch(message_id).await)?,
        Step::Truncate { message_id } => {
            serde_json::to_value(dispatcher.truncate(message_id).await)?
        }
        Step::RestartFrom {
            message_id,
            offset,
            multi_candidate,
        } => serde_json::to_value(
            dispatcher
                .restart_from(message_id, *offset, *multi_candidate)
                .await,
        )?,
        Step::RunExample { text } => serde_json::to_value(dispatcher.run_example(text).await)?,
        Step::DeleteMessage { message_id } => {
            serde_json::to_value(dispatcher.delete_message(message_id).await)?
        }
        Step::EditMessage { message_id, text } => {
            serde_json::to_value(dispatcher.edit_message(message_id, text).await)?
        }
        Step::RequestDiagram { message_id, text } => {
            serde_json::to_value(dispatcher.request_diagram(message_id, text).await)?
        }
        Step::ShowSystemMessages { on } => {
            display.set_show_system_messages(*on);
            session.republish().await;
            let visible = session.view_updates().borrow().visible_ids.len();
            json!({ "show_system_messages": on, "visible": visible })
        }
        Step::EnterSelection => {
            session.set_selection_mode(true);
            json!({ "selection": session.selection_mode() })
        }
        Step::ExitSelection => {
            session.set_selection_mode(false);
            json!({ "selection": session.selection_mode() })
        }
        Step::Escape => json!({ "consumed": session.on_escape() }),
        Step::SelectAll { on } => {
            session.select_all(*on).await;
            json!({ "selected": session.selection().len() })
        }
        Step::Toggle { message_id, on } => {
            session.toggle_selected(message_id, *on);
            json!({ "selected": session.selection().len() })
        }
        Step::DeleteSelected => json!({ "removed": session.delete_selected().await }),
        Step::Speak { text } => serde_json::to_value(session.media().speak(text).await)?,
        Step::Imagine { text } => serde_json::to_value(session.media().imagine(text).await)?,
        Step::Render => Value::Null,
    };
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use threadline_core::timeline::SelectionMode;

    const SCRIPT: &str = r#"
conversation_id = "demo"
replies = ["A darker version of the plot, where the kingdom falls to a plague and the heroes are exiled."]

[[messages]]
id = "sys"
role = "system"
text = "You are a novelist."

[[messages]]
id = "u1"
role = "user"
text = "Outline a fantasy plot."

[[messages]]
id = "a1"
role = "assistant"
text = "A young mage discovers a hidden library beneath the capital and must decide whom to trust."

[[messages]]
id = "u2"
role = "user"
text = "Make it darker."

[[steps]]
action = "restart_from"
message_id = "u2"

[[steps]]
action = "render"

[[steps]]
action = "branch"
message_id = "a1"

[[steps]]
action = "enter_selection"

[[steps]]
action = "toggle"
message_id = "u1"

[[steps]]
action = "toggle"
message_id = "ghost"

[[steps]]
action = "delete_selected"

[[steps]]
action = "imagine"
text = "a library"
"#;

    #[tokio::test]
    async fn test_replay_runs_every_step() {
        let script = ReplayScript::parse(SCRIPT).unwrap();
        let report = run(script, TimelineConfig::default()).await.unwrap();

        assert_eq!(report.steps.len(), 8);
        assert_eq!(report.steps[0].action, "restart_from");
        assert_eq!(report.steps[6].outcome, json!({ "removed": 1 }));

        let rendered = &report.renders[0];
        let target = rendered.diff_target().unwrap();
        assert!(target.message.text.starts_with("A darker version"));
        assert!(target.diff_previous_text.as_deref().unwrap().starts_with("A young mage"));

        assert_eq!(report.branches.len(), 1);

        let ids: Vec<&str> = report
            .final_view
            .entries
            .iter()
            .map(|e| e.message.id.as_str())
            .collect();
        assert_eq!(ids.len(), 3);
        assert!(!ids.contains(&"u1"));
        assert!(!ids.contains(&"sys"));
        assert!(report.final_view.selection.is_none());
    }

    #[tokio::test]
    async fn test_escape_without_selection_is_not_consumed() {
        let script = ReplayScript::parse(
            r#"
[[steps]]
action = "escape"

[[steps]]
action = "enter_selection"

[[steps]]
action = "escape"
"#,
        )
        .unwrap();

        let report = run(script, TimelineConfig::default()).await.unwrap();

        assert_eq!(report.steps[0].outcome, json!({ "consumed": false }));
        assert_eq!(
            report.steps[1].outcome,
            json!({ "selection": SelectionMode::Active })
        );
        assert_eq!(report.steps[2].outcome, json!({ "consumed": true }));
    }

    #[tokio::test]
    async fn test_show_system_messages_updates_published_view() {
        let script = ReplayScript::parse(
            r#"
[[messages]]
id = "sys"
role = "system"
text = "You are terse."

[[messages]]
id = "u1"
role = "user"
text = "Hi"

[[steps]]
action = "show_system_messages"
on = true

[[steps]]
action = "show_system_messages"
on = false
"#,
        )
        .unwrap();

        let report = run(script, TimelineConfig::default()).await.unwrap();

        assert_eq!(
            report.steps[0].outcome,
            json!({ "show_system_messages": true, "visible": 2 })
        );
        assert_eq!(
            report.steps[1].outcome,
            json!({ "show_system_messages": false, "visible": 1 })
        );
    }

    #[tokio::test]
    async fn test_execute_reads_script_and_config_files() {
        let temp_dir = TempDir::new().unwrap();
        let script_path = temp_dir.path().join("script.toml");
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&script_path, SCRIPT).unwrap();
        fs::write(&config_path, "show_system_messages = true\n").unwrap();

        execute(&script_path, Some(&config_path)).await.unwrap();
    }
}
