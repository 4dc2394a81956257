use crate::config::RenderFormat;
use crate::shared::SimulationStatus;
use crossbeam_channel as cbc;
use log::error;
use std::io::Write;

/// Renders one snapshot. Pure function of the status.
pub fn render(
    status: &SimulationStatus,
    format: RenderFormat,
) -> Result<String, serde_json::Error> {
    match format {
        RenderFormat::Text => Ok(render_line(status)),
        RenderFormat::Json => serde_json::to_string(status),
    }
}

pub fn render_line(status: &SimulationStatus) -> String {
    format!(
        "Floor: {:.1} | Moving: {} | Capacity: {}/{} | Waiting: {} | Delivered: {} | State: {}",
        status.cabin.current_floor,
        status.cabin.motion,
        status.cabin.occupancy,
        status.cabin.capacity,
        status.waiting,
        status.delivered,
        status.state
    )
}

/// Prints every received snapshot until the channel closes.
pub fn run_renderer<W: Write>(
    status_rx: cbc::Receiver<SimulationStatus>,
    format: RenderFormat,
    mut out: W,
) {
    for status in status_rx.iter() {
        let frame = match render(&status, format) {
            Ok(frame) => frame,
            Err(e) => {
                error!("Error rendering status: {}", e);
                continue;
            }
        };
        if let Err(e) = writeln!(out, "{}", frame) {
            error!("Error writing status: {}", e);
            return;
        }
    }
}
