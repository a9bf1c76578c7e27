pub mod card_grid_ui;
pub mod completion_banner_ui;
pub mod game_info_ui;
pub mod help_dialog;
pub mod media_sound_player;
pub mod session_timer;
pub mod stats_dialog;
pub mod window;
