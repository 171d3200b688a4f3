// SPDX-License-Identifier: GPL-3.0-only

//! Shared fixtures for integration tests
//!
//! `FakeRecipeService` parks every call until the test answers it, so tests
//! decide the order in which completions arrive.

#![allow(dead_code)]

use fridgemate::backends::camera::{CameraFrame, MediaCaptureSession, StillImageBackend};
use fridgemate::pipelines::recipe::RecipeService;
use fridgemate::{DetectionError, Generation, Orchestrator, Recipe, SourceImage};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

type Reply = Result<Generation, DetectionError>;

struct PendingCall {
    name: String,
    reply: oneshot::Sender<Reply>,
}

#[derive(Default)]
pub struct FakeRecipeService {
    pending: Mutex<VecDeque<PendingCall>>,
    calls: Mutex<Vec<String>>,
}

impl FakeRecipeService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Names of every image sent so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn pending(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    /// Answer the oldest parked call for `name`
    pub fn reply(&self, name: &str, reply: Reply) {
        let call = {
            let mut pending = self.pending.lock().unwrap();
            let index = pending
                .iter()
                .position(|call| call.name == name)
                .unwrap_or_else(|| panic!("no pending call for {}", name));
            pending.remove(index).unwrap()
        };
        call.reply.send(reply).ok();
    }

    pub fn succeed(&self, name: &str, generation: Generation) {
        self.reply(name, Ok(generation));
    }

    /// Answer every parked call with the same generation
    pub fn succeed_all(&self, generation: Generation) -> usize {
        let calls: Vec<_> = self.pending.lock().unwrap().drain(..).collect();
        let count = calls.len();
        for call in calls {
            call.reply.send(Ok(generation.clone())).ok();
        }
        count
    }

    pub fn fail(&self, name: &str, error: DetectionError) {
        self.reply(name, Err(error));
    }
}

impl RecipeService for FakeRecipeService {
    fn detect_and_generate(&self, image: SourceImage) -> BoxFuture<'static, Reply> {
        let (reply, answer) = oneshot::channel();
        let name = image.name().to_string();
        self.calls.lock().unwrap().push(name.clone());
        self.pending
            .lock()
            .unwrap()
            .push_back(PendingCall { name, reply });

        async move {
            answer
                .await
                .unwrap_or_else(|_| Err(DetectionError::Transport("call abandoned".to_string())))
        }
        .boxed()
    }
}

pub fn image(name: &str, len: usize) -> SourceImage {
    SourceImage::new(name, "image/jpeg", vec![0xAB; len])
}

pub fn generation(title: &str, ingredients: &[&str], steps: &[&str]) -> Generation {
    Generation::new(Recipe {
        title: title.to_string(),
        ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
        steps: steps.iter().map(|s| s.to_string()).collect(),
    })
}

pub fn still_backend() -> StillImageBackend {
    StillImageBackend::from_frame(CameraFrame::from_rgba(8, 6, vec![128u8; 8 * 6 * 4]))
}

pub fn orchestrator_with(service: &Arc<FakeRecipeService>, backend: StillImageBackend) -> Orchestrator {
    let camera = MediaCaptureSession::new(Box::new(backend), 90);
    Orchestrator::new(service.clone(), camera).unwrap()
}

pub fn orchestrator(service: &Arc<FakeRecipeService>) -> Orchestrator {
    orchestrator_with(service, still_backend())
}
