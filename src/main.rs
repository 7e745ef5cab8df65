use dotenv::dotenv;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use teloxide::{prelude::*, utils::command::BotCommands};

use recipe_lookup::config::Config;
use recipe_lookup::{App, Event, HttpRecipeApi, RecipeApi, SlotStorage, SqliteStorage};

mod chat;
use chat::ChatView;

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(BotCommands, Clone)]
#[command(
    rename_rule = "lowercase",
    description = "These commands are supported:"
)]
enum Command {
    #[command(description = "Display this text.")]
    Help,
    #[command(description = "Show your liked recipes.")]
    Start,
    #[command(description = "Search recipes, e.g. /search pizza.")]
    Search(String),
    #[command(description = "Show a page of the current results.")]
    Page(usize),
    #[command(description = "Open a recipe by id.")]
    Recipe(String),
    #[command(description = "Add one serving.")]
    More,
    #[command(description = "Remove one serving.")]
    Less,
    #[command(description = "Add the recipe ingredients to the shopping list.")]
    Add,
    #[command(description = "Like or unlike the open recipe.")]
    Like,
    #[command(description = "Remove an item from the shopping list.")]
    Delete(String),
    #[command(
        description = "Change the count of a shopping list item: /count <item> <n>.",
        parse_with = "split"
    )]
    Count(String, f64),
}

impl Command {
    fn into_event(self) -> Option<Event> {
        Some(match self {
            Command::Help => return None,
            Command::Start => Event::Load,
            Command::Search(query) => Event::Search(query),
            Command::Page(page) => Event::GoToPage(page),
            Command::Recipe(id) => Event::Navigate(id),
            Command::More => Event::IncreaseServings,
            Command::Less => Event::DecreaseServings,
            Command::Add => Event::AddToList,
            Command::Like => Event::ToggleLike,
            Command::Delete(id) => Event::DeleteItem(id.trim().to_string()),
            Command::Count(id, count) => Event::UpdateCount(id, count),
        })
    }
}

/// One application per chat, sharing the recipe client and the storage.
struct Sessions {
    api: Arc<dyn RecipeApi>,
    storage: Arc<dyn SlotStorage>,
    results_per_page: usize,
    apps: Mutex<HashMap<ChatId, Arc<App>>>,
}

impl Sessions {
    /// Returns the chat's app and whether it was just created.
    fn open(&self, chat: ChatId) -> (Arc<App>, bool) {
        let mut apps = self.apps.lock();
        if let Some(app) = apps.get(&chat) {
            return (app.clone(), false);
        }
        log::info!("Starting session for chat {chat}");
        let app = Arc::new(App::new(
            self.api.clone(),
            self.storage.clone(),
            format!("likes:{chat}"),
            self.results_per_page,
        ));
        apps.insert(chat, app.clone());
        (app, true)
    }
}

#[tokio::main]
async fn main() -> HandlerResult {
    // Load all env variables from .env file.
    dotenv().ok();
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "info");
    }
    pretty_env_logger::init();
    log::info!("Starting bot...");

    let config = Config::from_env()?;
    let bot = Bot::from_env();

    log::info!("Opening likes storage");
    let storage = SqliteStorage::open(&config.likes_db_path)?;
    let api = HttpRecipeApi::new(config.api_url.clone(), config.http_timeout)?;

    let sessions = Arc::new(Sessions {
        api: Arc::new(api),
        storage: Arc::new(storage),
        results_per_page: config.results_per_page,
        apps: Mutex::new(HashMap::new()),
    });

    let handler = Update::filter_message()
        .filter_command::<Command>()
        .endpoint(handle_command);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![sessions])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
    Ok(())
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    sessions: Arc<Sessions>,
) -> HandlerResult {
    let Some(event) = cmd.into_event() else {
        bot.send_message(msg.chat.id, Command::descriptions().to_string())
            .await?;
        return Ok(());
    };

    let (app, fresh) = sessions.open(msg.chat.id);
    let mut view = ChatView::new(bot, msg.chat.id);
    if fresh && event != Event::Load {
        app.dispatch(Event::Load, &mut view).await;
    }
    app.dispatch(event, &mut view).await;
    view.flush().await?;
    Ok(())
}
