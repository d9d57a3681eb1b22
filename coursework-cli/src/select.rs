//! Interactive selection of the target database and the courses to sync.
//!
//! Prompting stays in this module; the result is a plain [`Selection`] that
//! the sync pipeline consumes without a terminal.

use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, MultiSelect, Select};

use coursework_clients::{CanvasApi, NotionApi, SearchHit, SearchKind};
use coursework_core::types::{Course, DatabaseId, PageId};
use coursework_sync::Selection;

const DEFAULT_DATABASE_NAME: &str = "Assignments";

/// One row of the database picker.
#[derive(Debug, Clone, PartialEq, Eq)]
enum DatabaseChoice {
    CreateNew,
    Existing(SearchHit),
    SearchAgain,
}

impl DatabaseChoice {
    fn label(&self) -> String {
        match self {
            DatabaseChoice::CreateNew => "+ Create a new database".to_string(),
            DatabaseChoice::Existing(hit) => display_title(&hit.title),
            DatabaseChoice::SearchAgain => "↻ Search again".to_string(),
        }
    }
}

/// Ask for a database and a set of courses.
pub async fn run<C, N>(canvas: &C, notion: &N) -> Result<Selection>
where
    C: CanvasApi,
    N: NotionApi,
{
    let theme = ColorfulTheme::default();
    let database = choose_database(&theme, notion).await?;
    let courses = canvas
        .list_courses()
        .await
        .context("failed to list Canvas courses")?;
    let courses = choose_courses(&theme, courses)?;
    Ok(Selection { database, courses })
}

async fn choose_database<N: NotionApi>(theme: &ColorfulTheme, notion: &N) -> Result<DatabaseId> {
    loop {
        let query: String = Input::with_theme(theme)
            .with_prompt("Search Notion databases")
            .allow_empty(true)
            .interact_text()
            .context("database search prompt cancelled")?;
        let hits = notion
            .search(query.trim(), SearchKind::Database)
            .await
            .context("Notion database search failed")?;

        let choices = database_choices(hits);
        let labels: Vec<String> = choices.iter().map(DatabaseChoice::label).collect();
        let picked = Select::with_theme(theme)
            .with_prompt("Target database")
            .items(&labels)
            .default(0)
            .interact()
            .context("database selection cancelled")?;

        match &choices[picked] {
            DatabaseChoice::Existing(hit) => return Ok(DatabaseId(hit.id.clone())),
            DatabaseChoice::CreateNew => return create_database(theme, notion, &query).await,
            DatabaseChoice::SearchAgain => continue,
        }
    }
}

async fn create_database<N: NotionApi>(
    theme: &ColorfulTheme,
    notion: &N,
    query: &str,
) -> Result<DatabaseId> {
    let parent = choose_parent_page(theme, notion).await?;
    let name: String = Input::with_theme(theme)
        .with_prompt("Database name")
        .default(default_database_name(query))
        .interact_text()
        .context("database name prompt cancelled")?;
    let name = name.trim();

    let database = notion
        .create_database(&parent, name)
        .await
        .with_context(|| format!("failed to create database '{name}'"))?;
    println!("{} Created database '{name}'", "✓".green().bold());
    Ok(database)
}

async fn choose_parent_page<N: NotionApi>(theme: &ColorfulTheme, notion: &N) -> Result<PageId> {
    loop {
        let query: String = Input::with_theme(theme)
            .with_prompt("Search for a parent page")
            .allow_empty(true)
            .interact_text()
            .context("parent page search prompt cancelled")?;
        let hits = notion
            .search(query.trim(), SearchKind::Page)
            .await
            .context("Notion page search failed")?;
        if hits.is_empty() {
            tracing::warn!("no pages matched; make sure the page is shared with the integration");
            continue;
        }

        let labels: Vec<String> = hits.iter().map(|hit| display_title(&hit.title)).collect();
        let picked = Select::with_theme(theme)
            .with_prompt("Parent page")
            .items(&labels)
            .default(0)
            .interact()
            .context("parent page selection cancelled")?;
        return Ok(PageId(hits[picked].id.clone()));
    }
}

fn choose_courses(theme: &ColorfulTheme, courses: Vec<Course>) -> Result<Vec<Course>> {
    let courses = sort_courses(courses);
    if courses.is_empty() {
        tracing::warn!("no Canvas courses found for this account");
        return Ok(courses);
    }

    let labels: Vec<String> = courses.iter().map(Course::display_name).collect();
    let picked = MultiSelect::with_theme(theme)
        .with_prompt("Courses to sync (space to toggle, enter to confirm)")
        .items(&labels)
        .interact()
        .context("course selection cancelled")?;
    Ok(pick(courses, &picked))
}

// ---------------------------------------------------------------------------
// Pure helpers
// ---------------------------------------------------------------------------

/// "Create new" first, then the hits, then a retry row.
fn database_choices(hits: Vec<SearchHit>) -> Vec<DatabaseChoice> {
    std::iter::once(DatabaseChoice::CreateNew)
        .chain(hits.into_iter().map(DatabaseChoice::Existing))
        .chain(std::iter::once(DatabaseChoice::SearchAgain))
        .collect()
}

fn default_database_name(query: &str) -> String {
    let query = query.trim();
    if query.is_empty() {
        DEFAULT_DATABASE_NAME.to_string()
    } else {
        query.to_string()
    }
}

fn display_title(title: &str) -> String {
    let title = title.trim();
    if title.is_empty() {
        "(untitled)".to_string()
    } else {
        title.to_string()
    }
}

fn sort_courses(mut courses: Vec<Course>) -> Vec<Course> {
    courses.sort_by_cached_key(|c| (c.display_name().to_lowercase(), c.id));
    courses
}

/// Keep the courses at `indices`, in list order.
fn pick(courses: Vec<Course>, indices: &[usize]) -> Vec<Course> {
    courses
        .into_iter()
        .enumerate()
        .filter(|(i, _)| indices.contains(i))
        .map(|(_, course)| course)
        .collect()
}
