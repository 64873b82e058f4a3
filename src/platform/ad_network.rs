//! In-process rewarded-ad network
//!
//! Answers every request on the spot: present, reward, dismiss, then load the
//! next ad. Fill is random so the "no ad available" path gets exercised too.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::ads::{AdEvent, AdNetworkEnd, AdRequest};

#[derive(Debug)]
pub struct SimulatedAdNetwork {
    end: AdNetworkEnd,
    rng: Pcg32,
    /// Chance an ad load succeeds
    fill_rate: f64,
    loaded: bool,
    /// Ads shown to completion
    pub rewards_paid: u32,
}

impl SimulatedAdNetwork {
    pub fn new(end: AdNetworkEnd, seed: u64, fill_rate: f64) -> Self {
        Self {
            end,
            rng: Pcg32::seed_from_u64(seed),
            fill_rate: fill_rate.clamp(0.0, 1.0),
            loaded: false,
            rewards_paid: 0,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Try to load an ad and tell the game how it went
    pub fn load(&mut self) {
        self.loaded = self.rng.random_bool(self.fill_rate);
        let event = if self.loaded {
            AdEvent::RewardAdLoaded
        } else {
            AdEvent::RewardAdUnavailable
        };
        log::debug!("Ad network: {:?}", event);
        self.send(event);
    }

    /// Answer everything the game asked for since the last pump
    pub fn pump(&mut self) {
        while let Some(request) = self.end.next_request() {
            match request {
                AdRequest::ShowRewardedVideo => self.present(),
            }
        }
    }

    fn present(&mut self) {
        if !self.loaded {
            self.send(AdEvent::FailedToPresent("no ad loaded".into()));
            return;
        }
        self.loaded = false;
        self.send(AdEvent::WillPresent);
        self.send(AdEvent::RewardEarned);
        self.send(AdEvent::DidOrWillDismiss);
        self.rewards_paid += 1;
        log::info!("Ad network: rewarded video shown ({} total)", self.rewards_paid);
        self.load();
    }

    fn send(&self, event: AdEvent) {
        if !self.end.send(event) {
            log::warn!("Ad network: game side disconnected");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ads::ad_channel;

    #[test]
    fn test_full_fill_serves_reward() {
        let (link, end) = ad_channel();
        let mut network = SimulatedAdNetwork::new(end, 5, 1.0);
        network.load();
        assert!(network.is_loaded());

        link.request_rewarded_ad();
        network.pump();
        assert_eq!(
            link.poll(),
            vec![
                AdEvent::RewardAdLoaded,
                AdEvent::WillPresent,
                AdEvent::RewardEarned,
                AdEvent::DidOrWillDismiss,
                AdEvent::RewardAdLoaded,
            ]
        );
        assert_eq!(network.rewards_paid, 1);
    }

    #[test]
    fn test_no_fill_fails_to_present() {
        let (link, end) = ad_channel();
        let mut network = SimulatedAdNetwork::new(end, 5, 0.0);
        network.load();
        link.request_rewarded_ad();
        network.pump();
        let events = link.poll();
        assert_eq!(events[0], AdEvent::RewardAdUnavailable);
        assert!(matches!(events[1], AdEvent::FailedToPresent(_)));
        assert_eq!(network.rewards_paid, 0);
    }
}
