//! Nimbus OSR demo
//!
//! Drives an `ExternalOutputSurface` end to end without any GPU: the
//! software context completes sync tokens through a task queue, the
//! console consumer acknowledges each flip through the same queue, and
//! the loop below pumps it once per frame.

mod software_buffer;
mod software_gpu;

use std::sync::{Arc, Mutex};

use nimbus_osr_engine::nimbus::gpu::BufferHandle;
use nimbus_osr_engine::nimbus::log::LogSeverity;
use nimbus_osr_engine::nimbus::output::{
    ExternalOutputSurface, FlipAckCallback, FlipNotifier, LatencyInfo, OutputFrame, OutputSurface,
    OutputSurfaceClient, PresentationFeedback, ReshapeParams, SwapTimings,
};
use nimbus_osr_engine::nimbus::{Rect, Size, TaskQueue};
use nimbus_osr_engine::{osr_info, Engine, NimbusResult};

use software_buffer::SoftwareAllocator;
use software_gpu::SoftwareGpu;

const SOURCE: &str = "nimbus_demo";

/// Consumer that prints each flip and acknowledges it on the next pump
struct ConsoleConsumer {
    tasks: TaskQueue,
}

impl FlipNotifier for ConsoleConsumer {
    fn on_after_flip(
        &self,
        handle: BufferHandle,
        damage: Rect,
        new_buffer_identity: bool,
        done: FlipAckCallback,
    ) {
        println!(
            "  consumer: flip buffer={} damage={}x{}+{}+{} new_identity={}",
            handle.id, damage.width, damage.height, damage.x, damage.y, new_buffer_identity
        );
        // Acknowledge asynchronously, like a real cross-process consumer.
        self.tasks.post(done);
    }
}

/// Telemetry sink printing what a renderer would consume
struct ConsoleClient;

impl OutputSurfaceClient for ConsoleClient {
    fn did_receive_swap_ack(&mut self, _timings: SwapTimings, latency: Vec<LatencyInfo>) {
        let traces: Vec<u64> = latency.iter().map(|l| l.trace_id).collect();
        println!("  client: swap ack, latency traces {:?}", traces);
    }

    fn did_receive_presentation_feedback(&mut self, feedback: PresentationFeedback) {
        println!(
            "  client: presented, nominal interval {:?}",
            feedback.interval
        );
    }

    fn did_swap_with_size(&mut self, size: Size) {
        println!("  client: swapped at {}x{}", size.width, size.height);
    }
}

fn main() -> NimbusResult<()> {
    Engine::set_min_severity(LogSeverity::Debug);

    let tasks = TaskQueue::new();
    let gpu = Arc::new(SoftwareGpu::new(tasks.clone()));
    let allocator = Arc::new(SoftwareAllocator::new());
    let consumer = Arc::new(ConsoleConsumer {
        tasks: tasks.clone(),
    });

    let mut surface = ExternalOutputSurface::new(gpu.clone(), allocator, consumer);
    surface.set_client(Arc::new(Mutex::new(ConsoleClient)));
    surface.set_needs_swap_size_notifications(true);

    surface.reshape(&ReshapeParams::with_size(Size::new(640, 480)));

    for frame in 0..6u64 {
        if frame == 3 {
            osr_info!(SOURCE, "resizing output to 800x600");
            surface.reshape(&ReshapeParams::with_size(Size::new(800, 600)));
        }

        println!("frame {}", frame);
        surface.bind_framebuffer()?;
        // Rendering would record draw commands here.
        let mut output = OutputFrame::new(surface.size());
        output.latency.push(LatencyInfo { trace_id: frame });
        surface.submit_frame(output)?;

        // One pump completes the GPU work, delivers the flip, and runs
        // the deferred consumer acknowledgment.
        tasks.run_until_idle();
    }

    osr_info!(
        SOURCE,
        "done: {} pooled surfaces, {} imported images",
        surface.surface_count(),
        gpu.image_count()
    );

    Ok(())
}
