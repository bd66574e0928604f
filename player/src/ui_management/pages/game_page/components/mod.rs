pub mod notification_feed;
pub mod word_input_box;
pub mod word_list;
