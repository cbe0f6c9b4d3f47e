use tokio::sync::mpsc;

use crate::domain::navigation::Navigation;
use crate::domain::ports::Navigator;

// Forwards every redirect to whoever owns the view (router task, runner loop).
#[derive(Clone)]
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<Navigation>,
}

impl ChannelNavigator {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Navigation>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, navigation: &Navigation) {
        if self.tx.send(navigation.clone()).is_err() {
            tracing::warn!(?navigation, "navigation dropped, no view attached");
        }
    }
}
