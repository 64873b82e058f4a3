//! Rewarded-ad collaborator contract
//!
//! The game never talks to an ad SDK. It sends `AdRequest`s down a channel and
//! drains `AdEvent`s once per frame; whoever owns the other end (a real SDK
//! bridge or `platform::SimulatedAdNetwork`) answers asynchronously.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

/// Requests from the game to the ad network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdRequest {
    ShowRewardedVideo,
}

/// Notifications from the ad network
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdEvent {
    /// A rewarded ad is loaded and can be shown
    RewardAdLoaded,
    /// No rewarded ad available right now
    RewardAdUnavailable,
    /// Full-screen ad is about to show
    WillPresent,
    /// The player watched long enough to earn the reward
    RewardEarned,
    /// Full-screen ad closed (or is closing)
    DidOrWillDismiss,
    /// The ad could not be shown
    FailedToPresent(String),
}

/// Game-side end of the ad channel
#[derive(Debug)]
pub struct AdLink {
    requests: Sender<AdRequest>,
    events: Receiver<AdEvent>,
}

/// Network-side end of the ad channel
#[derive(Debug)]
pub struct AdNetworkEnd {
    requests: Receiver<AdRequest>,
    events: Sender<AdEvent>,
}

/// Create a connected pair
pub fn ad_channel() -> (AdLink, AdNetworkEnd) {
    let (req_tx, req_rx) = mpsc::channel();
    let (evt_tx, evt_rx) = mpsc::channel();
    (
        AdLink {
            requests: req_tx,
            events: evt_rx,
        },
        AdNetworkEnd {
            requests: req_rx,
            events: evt_tx,
        },
    )
}

impl AdLink {
    /// Ask the network to show a rewarded video. Failure to deliver is logged only.
    pub fn request_rewarded_ad(&self) {
        if self.requests.send(AdRequest::ShowRewardedVideo).is_err() {
            log::warn!("Ad network disconnected, rewarded ad request dropped");
        }
    }

    /// Everything the network sent since the last poll
    pub fn poll(&self) -> Vec<AdEvent> {
        self.events.try_iter().collect()
    }
}

impl AdNetworkEnd {
    /// Next pending request, if any
    pub fn next_request(&self) -> Option<AdRequest> {
        match self.requests.try_recv() {
            Ok(req) => Some(req),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Deliver an event. Returns false if the game side is gone.
    pub fn send(&self, event: AdEvent) -> bool {
        self.events.send(event).is_ok()
    }
}
