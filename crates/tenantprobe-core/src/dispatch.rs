//! 固定大小的 worker 池
//!
//! - 生成器在独立线程中顺序产出请求，经容量为 0 的通道逐个交给 worker；
//!   所有 worker 都忙时生成器阻塞，这是唯一的背压手段。
//! - worker 命中后把输出行发给调用线程，由调用线程逐行写出并 flush。
//! - 所有线程在作用域结束前 join，保证返回时输出已全部写出。
use std::io::Write;
use std::thread;

use anyhow::{anyhow, Result};
use crossbeam_channel as channel;
use tracing::debug;

use crate::options::RunStats;
use crate::probe::{probe, ProbeOutcome, Transport};
use crate::types::ProbeRequest;

/// 并发执行全部请求，命中行写入 `out`
pub fn run_probes<I>(requests: I, transport: &dyn Transport, workers: usize, out: &mut dyn Write) -> Result<RunStats>
where
    I: IntoIterator<Item = ProbeRequest>,
    I::IntoIter: Send,
{
    let workers = workers.max(1);
    let requests = requests.into_iter();

    // 无缓冲交接：send 在有 worker 接收前一直阻塞
    let (req_tx, req_rx) = channel::bounded::<ProbeRequest>(0);
    let (hit_tx, hit_rx) = channel::unbounded::<String>();

    thread::scope(|s| -> Result<RunStats> {
        let producer = s.spawn(move || {
            let mut generated = 0usize;
            for req in requests {
                generated += 1;
                if req_tx.send(req).is_err() {
                    break;
                }
            }
            // req_tx 在此被丢弃，worker 取完剩余请求后退出
            generated
        });

        let mut handles = Vec::with_capacity(workers);
        for id in 0..workers {
            let rx = req_rx.clone();
            let hits = hit_tx.clone();
            handles.push(s.spawn(move || {
                let mut stats = RunStats::default();
                for req in rx.iter() {
                    stats.attempted += 1;
                    match probe(&req, transport) {
                        ProbeOutcome::Matched => {
                            stats.matched += 1;
                            let _ = hits.send(req.hit_line());
                        }
                        ProbeOutcome::Missed => {}
                        ProbeOutcome::Failed => stats.failed += 1,
                    }
                }
                debug!(worker = id, attempted = stats.attempted, "worker finished");
                stats
            }));
        }
        drop(req_rx);
        drop(hit_tx);

        // 所有 worker 结束后 hit_rx 收到关闭信号；每行立即 flush，中断运行时已命中的行不丢
        let mut write_err = None;
        for line in hit_rx.iter() {
            if write_err.is_none() {
                if let Err(e) = out.write_all(line.as_bytes()).and_then(|_| out.flush()) {
                    write_err = Some(e);
                }
            }
        }

        let mut stats = RunStats::default();
        for h in handles {
            let ws = h.join().map_err(|_| anyhow!("worker thread panicked"))?;
            stats.merge(&ws);
        }
        stats.generated = producer.join().map_err(|_| anyhow!("producer thread panicked"))?;

        if let Some(e) = write_err {
            return Err(e.into());
        }
        out.flush()?;
        Ok(stats)
    })
}
