// Smartmark services
// Services provide cross-cutting functionality shared by managers and views.

pub mod change_feed;
