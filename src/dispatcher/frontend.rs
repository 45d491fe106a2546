//! The capability interface each frontend surface implements.

/// Operations the dispatcher invokes on a registered frontend.
///
/// Implemented by whatever owns a window; the dispatcher never renders
/// anything itself. Dialog methods block until the user answers and return
/// an empty string on cancellation.
pub trait Frontend: Send + Sync {
    fn quit(&self);

    /// Deliver the result of a call this frontend made.
    fn call_result(&self, result: &str);

    /// Deliver a backend event, already serialized to JSON.
    fn notify_event(&self, payload: &str);

    fn window_set_title(&self, title: &str);

    fn window_fullscreen(&self);

    fn window_unfullscreen(&self);

    fn window_set_colour(&self, colour: &str);

    fn open_file_dialog(&self, title: &str) -> String;

    fn save_file_dialog(&self, title: &str) -> String;

    fn open_directory_dialog(&self, title: &str) -> String;
}
