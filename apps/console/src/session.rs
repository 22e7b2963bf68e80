use std::sync::Arc;

use anyhow::Result;
use client_core::{
    EmployeeApi, FetchOutcome, ListController, ListEvent, MutationForm, RowActionDispatcher,
    SubmitOutcome,
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::error::RecvError,
};
use tracing::debug;

use crate::{
    commands::{apply_assignments, parse_command, Assignment, ConsoleCommand, HELP},
    render::{render_table, render_validation},
};

pub struct Session {
    api: Arc<dyn EmployeeApi>,
    controller: Arc<ListController>,
    rows: RowActionDispatcher,
}

impl Session {
    pub fn new(api: Arc<dyn EmployeeApi>, controller: Arc<ListController>) -> Self {
        let rows = RowActionDispatcher::new(api.clone(), controller.clone());
        Self {
            api,
            controller,
            rows,
        }
    }

    /// Reads commands from stdin until `quit` or end of input. The table is
    /// printed whenever a page is applied, including pages loaded after a
    /// debounced search settles.
    pub async fn run(&self) -> Result<()> {
        let mut events = self.controller.subscribe_events();
        let controller = self.controller.clone();
        let printer = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(ListEvent::Loaded { .. }) => {
                        print!("{}", render_table(&controller.snapshot().await));
                    }
                    Ok(ListEvent::FetchFailed { message, .. }) => {
                        eprintln!("could not load employees: {message}");
                    }
                    Ok(ListEvent::MutationFailed { message }) => {
                        eprintln!("change was not saved: {message}");
                    }
                    Ok(ListEvent::StaleResponseDiscarded { .. }) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(skipped, "table printer lagged behind list events");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        println!("{HELP}");
        self.controller.load().await;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            match parse_command(&line) {
                Ok(None) => {}
                Ok(Some(ConsoleCommand::Quit)) => break,
                Ok(Some(command)) => self.execute(command).await,
                Err(err) => eprintln!("{err:#}"),
            }
        }

        printer.abort();
        Ok(())
    }

    pub async fn execute(&self, command: ConsoleCommand) {
        match command {
            ConsoleCommand::Search(text) => self.controller.set_search(&text).await,
            ConsoleCommand::Sort(field) => report(self.controller.set_sort(field).await),
            ConsoleCommand::Page(page) => report(self.controller.set_page(page - 1).await),
            ConsoleCommand::Next => {
                let snapshot = self.controller.snapshot().await;
                if snapshot.has_next_page() {
                    report(self.controller.set_page(snapshot.query.page_index + 1).await);
                } else {
                    println!("already on the last page");
                }
            }
            ConsoleCommand::Prev => {
                let snapshot = self.controller.snapshot().await;
                if snapshot.has_previous_page() {
                    report(self.controller.set_page(snapshot.query.page_index - 1).await);
                } else {
                    println!("already on the first page");
                }
            }
            ConsoleCommand::Size(size) => report(self.controller.set_page_size(size).await),
            ConsoleCommand::Refresh => report(self.controller.refresh().await),
            ConsoleCommand::Add(assignments) => {
                self.submit(MutationForm::for_create(), &assignments).await
            }
            ConsoleCommand::Edit { id, assignments } => match self.controller.find_row(&id).await {
                Some(row) => self.submit(self.rows.edit(&row), &assignments).await,
                None => println!("no employee {id} on the current page"),
            },
            ConsoleCommand::Delete(id) => match self.controller.find_row(&id).await {
                Some(row) => {
                    if self.rows.delete(&row).await.is_ok() {
                        println!("deleted employee {id}");
                    }
                }
                None => println!("no employee {id} on the current page"),
            },
            ConsoleCommand::Help => println!("{HELP}"),
            ConsoleCommand::Quit => {}
        }
    }

    async fn submit(&self, mut form: MutationForm, assignments: &[Assignment]) {
        if let Err(err) = apply_assignments(form.values_mut(), assignments) {
            eprintln!("{err:#}");
            return;
        }
        let title = form.title();
        let outcome = form
            .submit(
                self.api.as_ref(),
                self.controller.departments(),
                self.controller.as_ref(),
            )
            .await;
        match outcome {
            SubmitOutcome::Saved => println!("{title}: saved"),
            SubmitOutcome::Invalid(errors) => {
                eprint!("{title}: not saved\n{}", render_validation(&errors))
            }
            // The failure itself is printed from the MutationFailed event.
            SubmitOutcome::Failed(_) | SubmitOutcome::NotOpen => {}
        }
    }
}

fn report(outcome: FetchOutcome) {
    if let FetchOutcome::Failed { seq, message } = outcome {
        debug!(seq, %message, "list command did not update the table");
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
