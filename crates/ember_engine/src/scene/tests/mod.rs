//! End-to-end scenarios across scenes, game objects and animation

mod scene_graph_scenarios;
