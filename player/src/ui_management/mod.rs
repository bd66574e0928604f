pub use self::ui_manager::UiManager;

mod components;
mod pages;
mod screen;
mod ui_manager;
