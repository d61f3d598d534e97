mod binding_tests;
mod components_tests;
mod probe_tests;
mod status_renderer_tests;
