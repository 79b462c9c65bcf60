//! The showcase scenes and their registration names.

mod ace_of_shadows;
mod game_select;
mod magic_words;
mod menu;
mod phoenix_flame;
mod start;

#[cfg(test)]
mod testing;

pub use ace_of_shadows::AceOfShadowsScene;
pub use game_select::GameSelectScene;
pub use magic_words::MagicWordsScene;
pub use menu::MenuScene;
pub use phoenix_flame::PhoenixFlameScene;
pub use start::StartScene;

use vitrine_engine::coords::{Vec2, Viewport};
use vitrine_ui::button::Button;
use vitrine_ui::{Application, SceneCtx};

use crate::config::ShowcaseConfig;

pub const MENU: &str = "menu";
pub const ACE_OF_SHADOWS: &str = "aceofshadows";
pub const MAGIC_WORDS: &str = "magicwords";
pub const PHOENIX_FLAME: &str = "phoenixflame";
pub const START: &str = "start";
pub const GAME_SELECT: &str = "gameselect";

/// Registers every scene under its name.
pub fn register_all(app: Application, config: &ShowcaseConfig) -> Application {
    app.scene(MENU, Box::new(MenuScene::new()))
        .scene(ACE_OF_SHADOWS, Box::new(AceOfShadowsScene::new()))
        .scene(MAGIC_WORDS, Box::new(MagicWordsScene::new(config.dialogue.location.clone())))
        .scene(PHOENIX_FLAME, Box::new(PhoenixFlameScene::new()))
        .scene(START, Box::new(StartScene::new(config.background_image())))
        .scene(GAME_SELECT, Box::new(GameSelectScene::new()))
}

/// Top-right corner placement for a "Back to Menu" button drawn at `scale`.
pub(crate) fn back_button_origin(viewport: Viewport, scale: f32, margin: f32) -> Vec2 {
    Vec2::new(viewport.width - Button::SIZE.x * scale - margin, margin)
}

/// Moves `button` to the top-right corner with the default margin.
pub(crate) fn place_back_button(ctx: &mut SceneCtx<'_>, button: &Button) {
    let origin = back_button_origin(ctx.viewport, 1.0, 20.0);
    ctx.stage.set_position(button.node(), origin);
}
