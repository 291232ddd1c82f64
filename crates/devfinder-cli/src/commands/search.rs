//! Conversational search command.

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use devfinder_core::types::{SearchCriterion, SearchResponse, SearchSession, SelectorKey};
use devfinder_core::{SearchOutcome, SessionPayload};

use crate::cli::{SearchArgs, SelectorArgs};
use crate::context::Context;
use crate::error::{CliError, Result};

/// Criterion type recorded for answers to follow-up questions.
const ANSWER_CRITERION: &str = "answer";

/// Parse a `TYPE=DESCRIPTION` criterion argument.
pub fn parse_criterion(raw: &str) -> Result<SearchCriterion> {
    let (kind, description) = raw.split_once('=').ok_or_else(|| {
        CliError::InvalidArgument(format!(
            "Criterion '{}' must have the form TYPE=DESCRIPTION",
            raw
        ))
    })?;

    let kind = kind.trim();
    if kind.is_empty() {
        return Err(CliError::InvalidArgument(format!(
            "Criterion '{}' has an empty type",
            raw
        )));
    }

    Ok(SearchCriterion::new(kind, description.trim()))
}

fn selector_overrides(args: &SelectorArgs) -> [(SelectorKey, Option<&str>); 6] {
    [
        (SelectorKey::Ram, args.ram.as_deref()),
        (SelectorKey::Rom, args.rom.as_deref()),
        (SelectorKey::Battery, args.battery.as_deref()),
        (SelectorKey::Camera, args.camera.as_deref()),
        (SelectorKey::Benchmark, args.benchmark.as_deref()),
        (SelectorKey::PriceRange, args.price_range.as_deref()),
    ]
}

/// Build the session a search submits: the stored console input and
/// selectors (unless `--fresh`), with flags layered on top.
pub fn build_session(stored: &SearchSession, args: &SearchArgs) -> Result<SearchSession> {
    let mut session = if args.fresh {
        SearchSession::default()
    } else {
        SearchSession {
            console_input: stored.console_input.clone(),
            selectors: stored.selectors.clone(),
            ..SearchSession::default()
        }
    };

    if let Some(console) = &args.console {
        session.console_input = console.clone();
    }

    for (key, value) in selector_overrides(&args.selectors) {
        if let Some(value) = value {
            session.selectors.insert(key, value);
        }
    }

    session.criteria = args
        .criteria
        .iter()
        .map(|raw| parse_criterion(raw))
        .collect::<Result<Vec<_>>>()?;

    Ok(session)
}

/// Run the search command
pub async fn run_search(ctx: &Context, args: SearchArgs) -> Result<()> {
    let stored = ctx.coordinator.session().snapshot().await;
    let mut session = build_session(&stored, &args)?;

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let submission = ctx
            .coordinator
            .submit(SessionPayload::from(session.clone()))
            .await?;
        debug!(request_id = %submission.criteria.request_id(), "criteria submitted");

        let response = match submission.search {
            SearchOutcome::Idle => {
                ctx.print(ctx.formatter.format_message(
                    "No criteria given; console input and selectors were saved.",
                ));
                return Ok(());
            }
            SearchOutcome::Superseded => {
                ctx.print(
                    ctx.formatter
                        .format_message("Search was superseded by a newer request."),
                );
                return Ok(());
            }
            SearchOutcome::Committed(response) => response,
        };

        ctx.print(ctx.formatter.format_search(&response));

        let SearchResponse::Ask { .. } = response else {
            return Ok(());
        };
        if !args.interactive {
            return Ok(());
        }

        let answer = match stdin.next_line().await? {
            Some(line) if !line.trim().is_empty() => line,
            _ => return Ok(()),
        };

        // Answers extend the history the backend sees.
        session.criteria = ctx.coordinator.session().snapshot().await.criteria;
        session
            .criteria
            .push(SearchCriterion::new(ANSWER_CRITERION, answer.trim()));
    }
}
