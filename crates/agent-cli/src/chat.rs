//! Terminal chat loop

use agent_core::session::keys;
use agent_core::{Agent, Message, SessionState};
use agent_news::{ModelBinding, news_assistant, storage_news_assistant};
use agent_runtime::LocalAgent;
use agent_utils::AppConfig;
use agent_workflow::{Coordinator, TurnTrace};
use std::io::{self, BufRead, Write};
use tracing::warn;

use crate::agents::{root_coordinator, storage_tools};
use crate::{ChatAgent, RouterKind};

const HELP: &str = "Commands:
  /trace  show how the last turn was routed
  /help   show this help
  /exit   leave the chat";

/// Who answers the chat
enum Responder {
    Root(Coordinator),
    Local(LocalAgent),
}

impl Responder {
    fn name(&self) -> &str {
        match self {
            Self::Root(root) => root.name(),
            Self::Local(agent) => agent.name(),
        }
    }

    /// Answer one message and record the exchange in the session
    async fn turn(&self, session: &mut SessionState, message: Message) -> Message {
        match self {
            Self::Root(root) => root
                .run_turn(session, message)
                .await
                .unwrap_or_else(|e| Message::agent(e.user_message())),
            Self::Local(agent) => {
                let reply = agent
                    .respond(session, message.clone())
                    .await
                    .unwrap_or_else(|e| {
                        warn!(error = %e, "turn failed");
                        Message::agent(e.user_message())
                    });
                session.append(message);
                session.append(reply.clone());
                reply
            }
        }
    }
}

async fn build_responder(
    config: &AppConfig,
    agent: ChatAgent,
    router: RouterKind,
    buckets: &[String],
) -> anyhow::Result<Responder> {
    let model = ModelBinding::from_app_config(config)?;

    Ok(match agent {
        ChatAgent::Root => Responder::Root(root_coordinator(config, &model, router)?),
        ChatAgent::News => Responder::Local(news_assistant(&model)?),
        ChatAgent::Storage => {
            Responder::Local(storage_news_assistant(&model, storage_tools(config, buckets).await?)?)
        }
    })
}

/// Read requests from stdin until EOF or `/exit`
pub async fn run(
    config: &AppConfig,
    agent: ChatAgent,
    router: RouterKind,
    session_id: String,
    buckets: &[String],
) -> anyhow::Result<()> {
    let responder = build_responder(config, agent, router, buckets).await?;
    let mut session = SessionState::new(session_id);

    println!("Chatting with {} (model {}). Type /help for commands.", responder.name(), config.model);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            println!();
            break;
        }

        match input.trim() {
            "" => {}
            "/exit" | "/quit" => break,
            "/help" => println!("{HELP}"),
            "/trace" => match session.get_typed::<TurnTrace>(keys::LAST_TURN)? {
                Some(trace) => println!("{}", serde_json::to_string_pretty(&trace)?),
                None => println!("No routed turn yet."),
            },
            text => {
                let reply = responder.turn(&mut session, Message::user(text)).await;
                println!("{}\n", reply.text());
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}
