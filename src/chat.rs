use recipe_lookup::api::RecipeSummary;
use recipe_lookup::likes::Like;
use recipe_lookup::list::ListItem;
use recipe_lookup::recipe::Recipe;
use recipe_lookup::view::{format_count, format_ingredient, limit_title, Region, View};
use teloxide::prelude::*;
use teloxide::types::{ChatAction, ParseMode};

static SPECIAL_CHARACTERS: [char; 19] = [
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!', '\\',
];

pub fn escape_markdown(str: &str) -> String {
    let mut new_str = String::with_capacity(str.len());
    for c in str.chars() {
        if SPECIAL_CHARACTERS.contains(&c) {
            new_str.push('\\');
        }
        new_str.push(c)
    }
    new_str
}

fn bold(text: &str) -> String {
    format!("*{}*", escape_markdown(text))
}

fn code(text: &str) -> String {
    format!("`{}`", text.replace('\\', "\\\\").replace('`', "\\`"))
}

/// Renders controller output as MarkdownV2 messages for one chat. Text is
/// buffered and sent by [`ChatView::flush`] once the event is handled.
pub struct ChatView {
    bot: Bot,
    chat: ChatId,
    messages: Vec<String>,
    added_items: Vec<String>,
    like_lines: Vec<String>,
    num_likes: Option<usize>,
}

impl ChatView {
    pub fn new(bot: Bot, chat: ChatId) -> Self {
        Self {
            bot,
            chat,
            messages: Vec::new(),
            added_items: Vec::new(),
            like_lines: Vec::new(),
            num_likes: None,
        }
    }

    fn recipe_text(recipe: &Recipe, liked: Option<bool>) -> String {
        let mut text = String::new();
        if let Some(liked) = liked {
            let heart = if liked { "❤️ " } else { "" };
            text.push_str(&format!(
                "{heart}{}\n{}\n",
                bold(&recipe.title),
                escape_markdown(&format!("by {}", recipe.author))
            ));
            text.push_str(&escape_markdown(&format!("⏱ {} min\n", recipe.time)));
        }
        text.push_str(&escape_markdown(&format!(
            "🍽 {} servings\n\n",
            recipe.servings
        )));
        for ingredient in recipe.scaled_ingredients() {
            text.push_str(&escape_markdown(&format!("• {}\n", format_ingredient(&ingredient))));
        }
        if liked.is_some() {
            text.push_str(&escape_markdown(&format!("\n{}\n", recipe.url)));
            text.push_str(&escape_markdown("\n/more /less servings, /add to list, /like"));
        }
        text
    }

    pub async fn flush(mut self) -> Result<(), teloxide::RequestError> {
        if !self.added_items.is_empty() {
            let text = format!(
                "{}\n{}",
                bold("Added to your shopping list:"),
                self.added_items.join("\n")
            );
            self.messages.push(text);
        }
        if !self.like_lines.is_empty() || self.num_likes.is_some_and(|n| n > 0) {
            let mut text = bold(&format!("Liked recipes ({})", self.num_likes.unwrap_or(0)));
            for line in &self.like_lines {
                text.push('\n');
                text.push_str(line);
            }
            self.messages.push(text);
        }

        for text in self.messages {
            self.bot
                .send_message(self.chat, text)
                .parse_mode(ParseMode::MarkdownV2)
                .await?;
        }
        Ok(())
    }
}

impl View for ChatView {
    fn render_loader(&mut self, region: Region) {
        log::debug!("Loading {region:?} for chat {}", self.chat);
        let request = self.bot.send_chat_action(self.chat, ChatAction::Typing);
        tokio::spawn(async move {
            if let Err(e) = request.await {
                log::warn!("Failed to send typing action: {e}");
            }
        });
    }

    fn clear_loader(&mut self) {}

    fn alert(&mut self, message: &str) {
        self.messages.push(escape_markdown(&format!("⚠️ {message}")));
    }

    fn clear_results(&mut self) {}

    fn render_results(&mut self, results: &[RecipeSummary], page: usize, num_pages: usize) {
        if results.is_empty() {
            self.messages.push(escape_markdown("No recipes found."));
            return;
        }
        let mut text = String::new();
        for result in results {
            text.push_str(&format!(
                "{} {}\n{}\n",
                bold(&limit_title(&result.title)),
                escape_markdown(&format!("({})", result.author)),
                code(&format!("/recipe {}", result.id)),
            ));
        }
        text.push_str(&escape_markdown(&format!("\nPage {page} of {num_pages}")));
        if page < num_pages {
            text.push_str(&format!(" {}", code(&format!("/page {}", page + 1))));
        }
        self.messages.push(text);
    }

    // A chat keeps no live result list to highlight in.
    fn highlight_selected(&mut self, _id: &str) {}

    fn clear_recipe(&mut self) {}

    fn render_recipe(&mut self, recipe: &Recipe, liked: bool) {
        self.messages.push(Self::recipe_text(recipe, Some(liked)));
    }

    fn update_servings_ingredients(&mut self, recipe: &Recipe) {
        self.messages.push(Self::recipe_text(recipe, None));
    }

    fn render_item(&mut self, item: &ListItem) {
        let line = format!(
            "{} {} {}",
            escape_markdown(&format_count(item.count)),
            escape_markdown(&format!("{} {}", item.unit, item.ingredient).trim().to_string()),
            code(&item.id),
        );
        self.added_items.push(line);
    }

    fn delete_item(&mut self, id: &str) {
        self.messages
            .push(format!("{} {}", escape_markdown("Removed"), code(id)));
    }

    fn update_item(&mut self, item: &ListItem) {
        self.messages.push(format!(
            "{} {}",
            code(&item.id),
            escape_markdown(&format!(
                "now {} {} {}",
                format_count(item.count),
                item.unit,
                item.ingredient
            )),
        ));
    }

    fn toggle_like_btn(&mut self, liked: bool) {
        let text = if liked { "❤️ Liked" } else { "🤍 Removed from likes" };
        self.messages.push(escape_markdown(text));
    }

    fn toggle_like_menu(&mut self, num_likes: usize) {
        self.num_likes = Some(num_likes);
    }

    fn render_like(&mut self, like: &Like) {
        self.like_lines.push(format!(
            "{} {}",
            escape_markdown(&format!("{} ({})", limit_title(&like.title), like.author)),
            code(&format!("/recipe {}", like.id)),
        ));
    }

    fn delete_like(&mut self, id: &str) {
        log::debug!("Like {id} removed in chat {}", self.chat);
    }
}
