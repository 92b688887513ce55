//! In-memory grid world for encoder and wrapper tests

use crate::grid::{
    Direction, GridEnvironment, GridState, ObservationGrid, RawObservation, StepOutcome,
};
use std::collections::HashMap;

const EMPTY: [u8; 3] = [1, 0, 0];
const GOAL: [u8; 3] = [8, 1, 0];

/// Open room with optional goals; actions move the agent one cell.
///
/// The agent's view is the top-left `view_width × view_height` window of
/// the room, so objects placed there show up in the observation image.
#[derive(Debug, Clone)]
pub(crate) struct FakeGrid {
    width: usize,
    height: usize,
    start: (usize, usize),
    start_dir: Direction,
    agent: (usize, usize),
    dir: Direction,
    objects: HashMap<(usize, usize), [u8; 3]>,
    view: (usize, usize),
    mission: String,
    steps: usize,
}

impl FakeGrid {
    pub(crate) fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            start: (0, 0),
            start_dir: Direction::Right,
            agent: (0, 0),
            dir: Direction::Right,
            objects: HashMap::new(),
            view: (7, 7),
            mission: "reach the goal".to_string(),
            steps: 0,
        }
    }

    pub(crate) fn with_goal(self, x: usize, y: usize) -> Self {
        self.with_object(x, y, GOAL)
    }

    pub(crate) fn with_object(mut self, x: usize, y: usize, cell: [u8; 3]) -> Self {
        self.objects.insert((x, y), cell);
        self
    }

    pub(crate) fn with_agent(mut self, x: usize, y: usize, dir: Direction) -> Self {
        self.start = (x, y);
        self.start_dir = dir;
        self.agent = (x, y);
        self.dir = dir;
        self
    }

    pub(crate) fn with_view_size(mut self, width: usize, height: usize) -> Self {
        self.view = (width, height);
        self
    }

    pub(crate) fn with_mission(mut self, mission: &str) -> Self {
        self.mission = mission.to_string();
        self
    }

    pub(crate) fn steps(&self) -> usize {
        self.steps
    }

    pub(crate) fn observe(&self) -> RawObservation {
        let (w, h) = self.view;
        let mut image = ObservationGrid::filled(w, h, EMPTY);
        for (&(x, y), &cell) in &self.objects {
            if x < w && y < h {
                image.set(x, y, cell).unwrap();
            }
        }
        RawObservation {
            image,
            mission: self.mission.clone(),
        }
    }
}

impl GridState for FakeGrid {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn agent_pos(&self) -> (usize, usize) {
        self.agent
    }

    fn agent_dir(&self) -> Direction {
        self.dir
    }

    fn object_at(&self, x: usize, y: usize) -> Option<u8> {
        self.objects.get(&(x, y)).map(|cell| cell[0])
    }
}

impl GridEnvironment for FakeGrid {
    type Action = Direction;

    fn reset(&mut self) -> RawObservation {
        self.agent = self.start;
        self.dir = self.start_dir;
        self.steps = 0;
        self.observe()
    }

    fn step(&mut self, action: Direction) -> StepOutcome {
        let (dx, dy) = action.to_vec();
        let (x, y) = self.agent;
        let nx = (x as i64 + i64::from(dx)).clamp(0, self.width as i64 - 1) as usize;
        let ny = (y as i64 + i64::from(dy)).clamp(0, self.height as i64 - 1) as usize;

        self.agent = (nx, ny);
        self.dir = action;
        self.steps += 1;

        let done = self.object_at(nx, ny) == Some(GOAL[0]);
        StepOutcome {
            observation: self.observe(),
            reward: if done { 1.0 } else { 0.0 },
            done,
        }
    }
}
